//! Database entities.

#![allow(missing_docs)]

pub mod activity;
pub mod activity_response;
pub mod forms_question;
pub mod forms_question_response;
pub mod module_completion;
pub mod user;
pub mod user_data;
pub mod user_defaults;
pub mod user_score;

pub use activity::Entity as Activity;
pub use activity_response::Entity as ActivityResponse;
pub use forms_question::Entity as FormsQuestion;
pub use forms_question_response::Entity as FormsQuestionResponse;
pub use module_completion::Entity as ModuleCompletion;
pub use user::Entity as User;
pub use user_data::Entity as UserData;
pub use user_defaults::Entity as UserDefaults;
pub use user_score::Entity as UserScore;
