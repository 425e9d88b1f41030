// src/prompts.rs
//! Instructions sent to the model for a contact lookup.

pub const CONTACT_SYSTEM_INSTRUCTION: &str = r#"You are an expert AI assistant specialized in finding public contact information. Given a LinkedIn profile URL, use web search to find the person's full name, public email address, phone number, and any personal or company websites. You must return the information as a JSON object. If a piece of information cannot be found, its value in the JSON should be null. The JSON object should have the following properties: "name", "email", "phone", "website", "linkedinUrl"."#;

pub fn contact_lookup_prompt(profile_url: &str) -> String {
    format!(
        "Find the public contact information for the person with this LinkedIn profile: {}. \
         The 'linkedinUrl' field in the JSON response must be this exact URL. \
         Respond with only the JSON object.",
        profile_url
    )
}
