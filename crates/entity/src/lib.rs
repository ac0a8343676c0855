pub mod user;
pub mod session;
pub mod organization;
pub mod organization_user;
pub mod course;
pub mod imap_connection;
pub mod lesson;
pub mod quiz;
pub mod course_content;
pub mod blocked_email;

pub use user::Entity as User;
pub use session::Entity as Session;
pub use organization::Entity as Organization;
pub use organization_user::Entity as OrganizationUser;
pub use course::Entity as Course;
pub use imap_connection::Entity as ImapConnection;
pub use lesson::Entity as Lesson;
pub use quiz::Entity as Quiz;
pub use course_content::Entity as CourseContent;
pub use blocked_email::Entity as BlockedEmail;

pub use course_content::ContentKind;
pub use organization_user::OrganizationRole;
