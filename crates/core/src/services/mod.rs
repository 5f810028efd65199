//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod activity_response;
pub mod completion;
pub mod forms_question;
pub mod media;
pub mod profile;
pub mod question_response;
pub mod report;
pub mod score;
pub mod user;
pub mod user_defaults;

#[cfg(test)]
mod test_support;

pub use activity::{ActivityInput, ActivityService, UpdateActivityInput};
pub use activity_response::{
    ActivityResponseService, CreateActivityResponseInput, ResponsePayload,
    UpdateActivityResponseInput,
};
pub use completion::CompletionService;
pub use forms_question::{FormsQuestionInput, FormsQuestionService, UpdateFormsQuestionInput};
pub use media::{MediaKind, MediaService};
pub use profile::{ProfileInput, ProfileService, UpdateProfileInput};
pub use question_response::{
    CreateQuestionResponseInput, QuestionResponseService, UpdateQuestionResponseInput,
};
pub use report::{AdminEntry, ReportService, ScoreSummary, UserInfoEntry};
pub use score::{ScoreInput, ScoreService};
pub use user::{CreateUserInput, TokenRequest, UpdateUserInput, UserService};
pub use user_defaults::{UserDefaultsInput, UserDefaultsService};
