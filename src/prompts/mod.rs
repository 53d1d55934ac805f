pub mod security_researcher_prompt;
