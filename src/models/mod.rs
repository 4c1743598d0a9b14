mod attendance;
mod course;
mod enrollment;
mod page;
mod user;

pub use attendance::{
    AttendanceRecordStatus, AttendanceRecordWithName, AttendanceSession,
};
pub use course::{Course, CourseTerm, CourseTermWithCourses};
pub use enrollment::Role;
pub use page::{Page, PageNavigationLink, VisibilitySetting};
pub use user::User;
