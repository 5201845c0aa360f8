pub mod choice;
pub mod profile;
pub mod purchase;
pub mod reminder;
pub mod session;

pub use choice::{Choice, REMINDER_CHOICES};
pub use profile::UserProfile;
pub use purchase::PurchaseEvaluation;
pub use reminder::ReminderTask;
pub use session::{ActiveConversation, Session};
