//! Outbound prompt assembly.
//!
//! Two prompt shapes exist. When the incoming message contains the trigger
//! keyword (case-insensitive substring match), the full intake template is
//! prepended along with the rendered conversation history. Otherwise the
//! message is passed through as a bare `User:`/`Assistant:` pair with no
//! instructions and no history.

/// Instruction template for the pediatric nutrition intake flow.
///
/// Encodes, in natural language for the downstream model, the strict
/// eight-question sequence and the output format of the final plan. The
/// sequencing contract is enforced entirely by the model's instruction
/// following; this service performs no local validation of question order.
const INTAKE_PROMPT: &str = "\nYou are a pediatric nutritionist chatbot. Your task is to gather information through a step-by-step conversation.\n\nIMPORTANT RULES:\n1. You must ONLY ask ONE question at a time\n2. DO NOT provide any nutrition advice or plans until you have gathered ALL required information\n3. DO NOT skip ahead or make assumptions\n4. If this is a new conversation, ALWAYS start with Question 1\n5. Track which question number you're on and only proceed when you get an answer\n\nFIRST MESSAGE:\nIf this is the start of the conversation, introduce yourself briefly and ask Question 1:\n\"Hello! I'm your pediatric nutrition assistant. To create a personalized nutrition plan, I need to ask you a few questions. First, what is your child's age?\"\n\nQUESTION SEQUENCE:\nQ1: What is your child's age?\nQ2: What is your child's current weight in kg?\nQ3: What is your child's height in cm?\nQ4: How would you describe your child's activity level (low/moderate/high)?\nQ5: Does your child have any food allergies or restrictions?\nQ6: What are your child's favorite foods?\nQ7: What foods does your child dislike?\nQ8: How many meals does your child typically eat per day?\n\nAfter ALL questions are answered, THEN AND ONLY THEN provide the nutrition plan in this format:\n\nSUMMARY:\n[Provide brief summary of gathered information]\n\nDAILY NUTRITION PLAN:\n| Meal | Time | Food Items | Portion Size | Calories |\n|------|------|------------|--------------|-----------|\n| Breakfast | 8:00 AM | [Foods] | [Portions] | [Cal] |\n[Continue table for all meals]\n\nIMPLEMENTATION TIPS:\n1. [Tip 1]\n2. [Tip 2]\n3. [Tip 3]\n\nFor each user message:\n- If it's a new conversation: Ask Question 1\n- If you already asked a question: Acknowledge their answer and ask the next question\n- If the answer is unclear: Ask for clarification of the current question\n- Only provide the final plan after Question 8 is answered\n";

/// Default trigger keyword selecting the intake template.
pub const DEFAULT_TRIGGER_KEYWORD: &str = "nutrition";

/// Builds the outbound prompt from a new user message and the rendered
/// conversation transcript.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    trigger: String,
}

impl PromptAssembler {
    /// Create an assembler with the given trigger keyword.
    ///
    /// The keyword is matched case-insensitively as a substring of the
    /// incoming message.
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into().to_lowercase(),
        }
    }

    /// Whether this message selects the intake template.
    pub fn is_triggered(&self, message: &str) -> bool {
        message.to_lowercase().contains(&self.trigger)
    }

    /// Assemble the outbound prompt.
    ///
    /// The triggered layout concatenates the template, history section,
    /// new-input section, and assistant marker without separator newlines
    /// between sections (the template itself starts and ends with one).
    pub fn assemble(&self, message: &str, transcript: &str) -> String {
        if self.is_triggered(message) {
            format!(
                "{INTAKE_PROMPT}--- Conversation History ---{transcript}--- New User Input ---User: {message}Assistant:"
            )
        } else {
            format!("User: {message}\nAssistant:")
        }
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_KEYWORD)
    }
}
