pub mod article;
pub mod category;
pub mod comment;
pub mod user;

pub use article::{Article, ArticleDetail, ArticleSummary, AuthoredArticle};
pub use category::Category;
pub use comment::{Comment, CommentView};
pub use user::{NewUser, User, UserProfile};
