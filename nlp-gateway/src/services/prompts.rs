//! Prompt templates sent to the provider.

pub fn sentiment(text: &str) -> String {
    format!(
        "Analyze the sentiment of the following text and provide a JSON response with:\n\
         - sentiment: positive/negative/neutral\n\
         - confidence: float between 0 and 1\n\
         - emotions: list of detected emotions\n\
         \n\
         Text: \"{text}\"\n\
         \n\
         Respond only with valid JSON."
    )
}

pub fn summary(text: &str, max_length: u32) -> String {
    format!(
        "Summarize the following text in approximately {max_length} characters:\n\
         \n\
         {text}\n\
         \n\
         Provide a concise, informative summary."
    )
}

pub fn translation(text: &str, source_language: &str, target_language: &str) -> String {
    format!(
        "Translate the following text from {source_language} to {target_language}:\n\
         \n\
         {text}\n\
         \n\
         Provide only the translation, no explanations."
    )
}
