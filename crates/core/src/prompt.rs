//! Prompt text sent to the chat and video models.

/// System message sent with every chat request.
pub const TUTOR_ROLE: &str = "You are a patient motorsport tutor for complete beginners.";

/// Instructions prepended to every question relayed to the chat model.
pub const TUTOR_INSTRUCTIONS: &str = "\
You are a stock car racing expert and teacher. Answer so that someone who has never watched a race can follow.
- Open with a plain answer of one or two sentences.
- Then go deeper using everyday language, analogies or a step-by-step walk-through.
- When the question touches on strategy (pit stops, tire wear, drafting, fuel windows), describe how it could be simulated or shown visually.
- Define every racing term the first time you use it.
- Keep the tone conversational and friendly.

Question: ";

/// Instructions that turn an explanation into a video request.
pub const VIDEO_INSTRUCTIONS: &str = "\
Create a short racing simulation video that illustrates the explanation below.
- Visualize the scenario it describes, such as pit stop timing, caution flags, tire wear or fuel levels.
- Show the cars on track from a simple overhead or broadcast-style camera.
- Use on-screen labels to say what is happening in beginner-friendly words.
- When strategy is involved, show the alternatives side by side or one after the other.
- Keep the tone educational for a viewer new to the sport.

Explanation: ";

/// Explanation used when the caller does not supply one.
pub const DEFAULT_EXPLANATION: &str = "\
Race cars are shaped to slip through the air with as little drag as possible. \
Drag is the push of the air against the car as it moves, much like water pushing against a swimmer. \
A smooth, pointed body lets air flow around the car instead of piling up in front of it, \
so the engine spends its power on speed rather than fighting the air. \
The same shape also presses the car onto the track, which keeps it stable through the turns.";

/// Build the chat prompt for a user question.
///
/// `instructions` replaces [`TUTOR_INSTRUCTIONS`] when given.
pub fn tutor_prompt(instructions: Option<&str>, question: &str) -> String {
    format!(
        "{}{}",
        instructions.unwrap_or(TUTOR_INSTRUCTIONS),
        question.trim()
    )
}

/// Build the video prompt, falling back to [`DEFAULT_EXPLANATION`] when
/// `explanation` is absent or blank.
pub fn video_prompt(explanation: Option<&str>) -> String {
    let explanation = explanation
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_EXPLANATION);
    format!("{}{}", VIDEO_INSTRUCTIONS, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_prompt_uses_explanation() {
        let prompt = video_prompt(Some("  Drafting lets the trailing car save fuel.  "));
        assert!(prompt.starts_with(VIDEO_INSTRUCTIONS));
        assert!(prompt.ends_with("Drafting lets the trailing car save fuel."));
    }

    #[test]
    fn test_video_prompt_default_explanation() {
        assert!(video_prompt(None).ends_with(DEFAULT_EXPLANATION));
        assert!(video_prompt(Some("   ")).ends_with(DEFAULT_EXPLANATION));
    }

    #[test]
    fn test_tutor_prompt() {
        let prompt = tutor_prompt(None, "What is a green flag?\n");
        assert!(prompt.starts_with(TUTOR_INSTRUCTIONS));
        assert!(prompt.ends_with("What is a green flag?"));

        let custom = tutor_prompt(Some("Be brief. Q: "), "What is a lap?");
        assert_eq!(custom, "Be brief. Q: What is a lap?");
    }
}
