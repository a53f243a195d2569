//! Flat transcript rendering for prompt context.

use nutribot_types::chat::Turn;

/// Render stored turns as a flat text block, one `"<sender>: <message>"`
/// line per turn, in insertion order.
///
/// The empty history renders as the empty string. No truncation or
/// summarization: the full history is always included.
pub fn render_transcript(turns: &[Turn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(&turn.sender.to_string());
        out.push_str(": ");
        out.push_str(&turn.message);
        out.push('\n');
    }
    out
}
