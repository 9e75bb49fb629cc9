pub mod category;
pub mod finder;
pub mod paginate;
pub mod quiz;

pub use category::{resolve, Resolved, ALL_CATEGORIES};
pub use finder::{NewQuestion, QuestionFinder, QuestionsPage};
pub use paginate::{page_number, paginate};
pub use quiz::{pick, QuizPick, QuizScope};
