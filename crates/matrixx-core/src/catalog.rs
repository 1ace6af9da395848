//! Static reference data: sidebar tools, their chat-surface policy, the
//! mock chat history, and the interview question set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::message::{Message, Role};

/// Default per-question time limit.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const DOCUMENT_TYPES: &[&str] = &[".pdf", ".docx", ".txt"];
const MEDIA_TYPES: &[&str] = &[".pdf", ".jpg", ".png", ".gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    General,
    Resume,
    Interview,
    CoverLetter,
    Portfolio,
}

impl Tool {
    /// Tools listed in the sidebar, in display order.
    pub const SIDEBAR: [Tool; 4] = [
        Tool::Resume,
        Tool::Interview,
        Tool::CoverLetter,
        Tool::Portfolio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::General => "general",
            Tool::Resume => "resume",
            Tool::Interview => "interview",
            Tool::CoverLetter => "cover-letter",
            Tool::Portfolio => "portfolio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::General => "General",
            Tool::Resume => "Resume Enhancer",
            Tool::Interview => "Interview Coach",
            Tool::CoverLetter => "Cover Letter Writer",
            Tool::Portfolio => "Portfolio Builder",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Tool::General => "Ask me anything about your career...",
            Tool::Resume => "Describe your target role or upload your resume...",
            Tool::Interview => "Tell me about the role you're interviewing for...",
            Tool::CoverLetter => "Paste the job description or describe the role...",
            Tool::Portfolio => "Describe your project or what you want to showcase...",
        }
    }

    pub fn file_upload_enabled(&self) -> bool {
        matches!(self, Tool::Resume | Tool::CoverLetter | Tool::Portfolio)
    }

    pub fn accepted_file_types(&self) -> &'static [&'static str] {
        match self {
            Tool::Resume | Tool::CoverLetter => DOCUMENT_TYPES,
            _ => MEDIA_TYPES,
        }
    }

    /// Id of the seeded welcome message, if the tool has one.
    pub fn welcome_id(&self) -> Option<String> {
        self.welcome_text()
            .map(|_| format!("welcome-{}", self.as_str()))
    }

    pub fn welcome_text(&self) -> Option<&'static str> {
        match self {
            Tool::General => None,
            Tool::Resume => Some(
                "Welcome to the Resume Enhancer! 📄\n\n\
                 I'll help you improve your resume for better ATS compatibility and overall impact. Here's what I can do:\n\n\
                 • Analyze formatting and structure\n\
                 • Optimize keywords for specific roles\n\
                 • Improve content clarity and impact\n\
                 • Ensure ATS compliance\n\
                 • Suggest better action words and quantifiable achievements\n\n\
                 Please upload your resume (PDF or DOCX) to get started, or tell me about the role you're targeting.",
            ),
            Tool::Interview => Some(
                "Welcome to the Interview Coach! 🎯\n\n\
                 I'll help you prepare for your upcoming interviews with personalized practice sessions. Here's how it works:\n\n\
                 • Tell me the role you're interviewing for\n\
                 • Choose specific topics to focus on (technical, behavioral, company-specific)\n\
                 • I'll ask realistic interview questions\n\
                 • Get real-time feedback on your responses\n\
                 • Track which key points you've covered\n\n\
                 What role are you preparing for? (e.g., \"Frontend Developer\", \"Product Manager\", \"Data Scientist\")",
            ),
            Tool::CoverLetter => Some(
                "Welcome to the Cover Letter Writer! ✍️\n\n\
                 I'll help you create compelling, personalized cover letters that stand out. Here's what I need:\n\n\
                 • Your resume (for experience and background)\n\
                 • The job description you're applying for\n\
                 • Any specific company information or requirements\n\n\
                 I'll craft a cover letter that:\n\
                 • Matches keywords from the job description\n\
                 • Highlights relevant experiences\n\
                 • Shows genuine interest in the company\n\
                 • Maintains a professional yet engaging tone\n\n\
                 Please upload your resume and paste the job description to get started.",
            ),
            Tool::Portfolio => Some(
                "Welcome to the Portfolio Builder! 🚀\n\n\
                 I'll help you create a professional portfolio that showcases your work effectively. Here's the process:\n\n\
                 • Share details about your projects (title, technologies, description)\n\
                 • Upload screenshots or images if you have them\n\
                 • I'll rewrite descriptions professionally\n\
                 • Generate a mini portfolio website with optimized layout\n\
                 • Ensure your work is presented in the best light\n\n\
                 Tell me about your first project, or describe what kind of portfolio you want to create (e.g., \"Web Developer Portfolio\", \"UX Designer Portfolio\").",
            ),
        }
    }

    /// Canned system reply used until a real backend exists.
    pub fn mock_reply(&self) -> String {
        format!(
            "Thank you for your message. This is a mock response for the {} tool. \
             In a real implementation, this would be connected to an AI service that \
             provides relevant assistance based on the selected tool.",
            self.as_str()
        )
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Tool::General),
            "resume" => Ok(Tool::Resume),
            "interview" => Ok(Tool::Interview),
            "cover-letter" => Ok(Tool::CoverLetter),
            "portfolio" => Ok(Tool::Portfolio),
            other => Err(ValidationError::UnknownTool(other.to_string())),
        }
    }
}

/// Passed through to the chat surface unchanged. Only `max_file_size_bytes`
/// feeds the attachment stager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSurfaceConfig {
    pub placeholder_text: String,
    pub accepted_file_types: Vec<String>,
    pub max_file_size_bytes: u64,
    pub file_upload_enabled: bool,
}

impl ChatSurfaceConfig {
    pub fn for_tool(tool: Tool, max_file_size_bytes: u64) -> Self {
        Self {
            placeholder_text: tool.placeholder().to_string(),
            accepted_file_types: tool
                .accepted_file_types()
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_file_size_bytes,
            file_upload_enabled: tool.file_upload_enabled(),
        }
    }

    /// Picker filter string, e.g. `.pdf,.docx,.txt`.
    pub fn accept_attribute(&self) -> String {
        self.accepted_file_types.join(",")
    }
}

/// Interview question reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub time_limit_seconds: u32,
}

/// The behavioral question set used by the practice screen.
pub fn default_questions(time_limit_seconds: u32) -> Vec<Question> {
    [
        "How would you handle a situation where your team misses a deadline?",
        "Describe a time when you had to learn a new technology quickly. How did you approach it?",
        "How do you prioritize tasks when everything seems urgent?",
        "Tell me about a challenging project you worked on and how you overcame obstacles.",
        "How do you handle feedback and criticism from colleagues or supervisors?",
    ]
    .into_iter()
    .zip(1..)
    .map(|(text, id)| Question {
        id,
        text: text.to_string(),
        time_limit_seconds,
    })
    .collect()
}

/// Sidebar "recent chats" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryItem {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub tool: Tool,
}

/// Fixed recent-chat list, timestamped relative to `now`.
pub fn recent_chats(now: DateTime<Utc>) -> Vec<ChatHistoryItem> {
    let item = |id: &str, title: &str, age: Duration, tool| ChatHistoryItem {
        id: id.to_string(),
        title: title.to_string(),
        timestamp: now - age,
        tool,
    };
    vec![
        item("1", "Software Engineer Resume Review", Duration::hours(2), Tool::Resume),
        item("2", "Frontend Developer Interview Prep", Duration::days(1), Tool::Interview),
        item(
            "3",
            "Google Cover Letter - Product Manager",
            Duration::days(3),
            Tool::CoverLetter,
        ),
        item("4", "React Portfolio Website", Duration::weeks(1), Tool::Portfolio),
    ]
}

/// Transcript loaded for any selected history entry.
pub fn mock_transcript(now: DateTime<Utc>) -> Vec<Message> {
    vec![
        Message::historical(
            "1",
            Role::System,
            "Hello! How can I help you today?",
            now - Duration::minutes(10),
        ),
        Message::historical(
            "2",
            Role::User,
            "I need help improving my resume for a software engineering position.",
            now - Duration::minutes(9),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_ids_round_trip() {
        for tool in Tool::SIDEBAR.into_iter().chain([Tool::General]) {
            assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
        }
        assert_eq!(
            "nope".parse::<Tool>(),
            Err(ValidationError::UnknownTool("nope".into()))
        );
    }

    #[test]
    fn general_has_no_welcome() {
        assert!(Tool::General.welcome_text().is_none());
        assert_eq!(Tool::Resume.welcome_id().as_deref(), Some("welcome-resume"));
        assert_eq!(
            Tool::CoverLetter.welcome_id().as_deref(),
            Some("welcome-cover-letter")
        );
    }

    #[test]
    fn surface_policy_per_tool() {
        let resume = ChatSurfaceConfig::for_tool(Tool::Resume, DEFAULT_MAX_FILE_SIZE_BYTES);
        assert!(resume.file_upload_enabled);
        assert_eq!(resume.accept_attribute(), ".pdf,.docx,.txt");

        let interview = ChatSurfaceConfig::for_tool(Tool::Interview, 1);
        assert!(!interview.file_upload_enabled);
        assert_eq!(interview.accept_attribute(), ".pdf,.jpg,.png,.gif");
        assert_eq!(interview.max_file_size_bytes, 1);
    }

    #[test]
    fn five_questions_with_ordinal_ids() {
        let qs = default_questions(DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(qs.len(), 5);
        assert_eq!(qs.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(qs.iter().all(|q| q.time_limit_seconds == 120));
    }

    #[test]
    fn mock_reply_names_tool() {
        assert!(Tool::CoverLetter.mock_reply().contains("cover-letter tool"));
    }
}
