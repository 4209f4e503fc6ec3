/*
 * src/sql_models/mod.rs
 *
 * File for shared Postgres row/enum types
 *
 * Purpose:
 *   Custom Postgres enum and composite types mapped via sqlx::Type, mirrored
 *   by a matching SQL type in migrations/.
 */

use sqlx::Type;

pub mod feedback;
pub mod place;
pub mod session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type)]
#[sqlx(type_name = "pace", rename_all = "lowercase")]
pub enum PaceDb {
    Relaxed,
    Moderate,
    Intensive,
}

impl From<PaceDb> for crate::models::story::Pace {
    fn from(p: PaceDb) -> Self {
        match p {
            PaceDb::Relaxed => crate::models::story::Pace::Relaxed,
            PaceDb::Moderate => crate::models::story::Pace::Moderate,
            PaceDb::Intensive => crate::models::story::Pace::Intensive,
        }
    }
}

impl From<crate::models::story::Pace> for PaceDb {
    fn from(p: crate::models::story::Pace) -> Self {
        match p {
            crate::models::story::Pace::Relaxed => PaceDb::Relaxed,
            crate::models::story::Pace::Moderate => PaceDb::Moderate,
            crate::models::story::Pace::Intensive => PaceDb::Intensive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type)]
#[sqlx(type_name = "feedback_op_kind", rename_all = "lowercase")]
pub enum FeedbackOpKind {
    Drop,
    Replace,
    Move,
    Insert,
    Swap,
    Reorder,
}
