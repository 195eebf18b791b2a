//! User-facing message copy as a closed set.
//!
//! Handlers pick a [`MessageKind`]; the text and severity live here so the
//! voice stays consistent and no handler ships ad-hoc strings.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSeverity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    SendLogged,
    Registration,
    ProfileUpdated,
    FeedbackSubmitted,
    NoRouteSelected,
    LoginFailed,
    UsernameInvalid,
    UsernameTaken,
    EmailTaken,
    GymNotFound,
    SendUpdateError,
    ProfileUpdateError,
}

impl MessageKind {
    pub fn severity(self) -> MessageSeverity {
        match self {
            MessageKind::SendLogged
            | MessageKind::Registration
            | MessageKind::ProfileUpdated
            | MessageKind::FeedbackSubmitted => MessageSeverity::Success,
            MessageKind::NoRouteSelected
            | MessageKind::LoginFailed
            | MessageKind::UsernameInvalid
            | MessageKind::UsernameTaken
            | MessageKind::EmailTaken
            | MessageKind::GymNotFound => MessageSeverity::Warning,
            MessageKind::SendUpdateError | MessageKind::ProfileUpdateError => {
                MessageSeverity::Error
            }
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MessageKind::SendLogged => "Send logged and chalked!",
            MessageKind::Registration => {
                "Welcome to the crag! Your account is ready for some epic sends!"
            }
            MessageKind::ProfileUpdated => "Beta updated - your profile is looking solid!",
            MessageKind::FeedbackSubmitted => {
                "Your beta has been shared with the crew! Thanks for helping us level up!"
            }
            MessageKind::NoRouteSelected => "Psst... you need to pick a route first!",
            MessageKind::LoginFailed => {
                "Whoops! That beta isn't matching our guidebook. Double-check and try again!"
            }
            MessageKind::UsernameInvalid => {
                "Keep your username clean like a nice jug - letters and numbers only!"
            }
            MessageKind::UsernameTaken => {
                "That username's already on the wall! Pick another and crush it!"
            }
            MessageKind::EmailTaken => "This email's already tied in! Maybe log in instead?",
            MessageKind::GymNotFound => {
                "This gym seems off the map. Pick another or help us add it!"
            }
            MessageKind::SendUpdateError => {
                "Send logging hit a sketchy section. Want to try that again?"
            }
            MessageKind::ProfileUpdateError => {
                "Profile update took a whipper! Let's try that again."
            }
        }
    }
}
