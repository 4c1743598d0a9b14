#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceRecordStatus {
    None = 0,
    Present = 1,
    Late = 2,
    Absent = 3,
    Excused = 4,
}

impl AttendanceRecordStatus {
    pub fn from_i64(v: i64) -> Option<AttendanceRecordStatus> {
        match v {
            0 => Some(AttendanceRecordStatus::None),
            1 => Some(AttendanceRecordStatus::Present),
            2 => Some(AttendanceRecordStatus::Late),
            3 => Some(AttendanceRecordStatus::Absent),
            4 => Some(AttendanceRecordStatus::Excused),
            _ => None,
        }
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

/// One sitting of a course. A null closing time means the session is still
/// in progress.
#[derive(Debug, Clone)]
pub struct AttendanceSession {
    pub attendance_session_id: i64,
    pub course_id: i64,
    pub title: String,
    pub opening_time: String,
    pub closing_time: Option<String>,
}

/// Record row joined with the student's name, for the session-edit view.
#[derive(Debug, Clone)]
pub struct AttendanceRecordWithName {
    pub user_uuid: String,
    pub full_name: String,
    pub status: AttendanceRecordStatus,
}
