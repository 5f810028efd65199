//! Repository layer.
//!
//! Each repository wraps a shared [`sea_orm::DatabaseConnection`] and exposes
//! the queries one aggregate needs.

mod activity;
mod activity_response;
mod forms_question;
mod forms_question_response;
mod module_completion;
mod user;
mod user_data;
mod user_defaults;
mod user_score;

pub use activity::ActivityRepository;
pub use activity_response::ActivityResponseRepository;
pub use forms_question::FormsQuestionRepository;
pub use forms_question_response::FormsQuestionResponseRepository;
pub use module_completion::ModuleCompletionRepository;
pub use user::UserRepository;
pub use user_data::UserDataRepository;
pub use user_defaults::UserDefaultsRepository;
pub use user_score::UserScoreRepository;
