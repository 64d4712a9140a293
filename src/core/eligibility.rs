use crate::domain::model::ContactRecord;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    #[error("already contacted")]
    AlreadyContacted,

    #[error("missing email address")]
    MissingEmail,

    #[error("email address has no '@'")]
    InvalidEmail,

    #[error("missing professor name")]
    MissingName,

    #[error("missing institution")]
    MissingInstitution,
}

/// 結構檢查先於業務規則，讓格式錯誤的列優先被回報
pub fn check(record: &ContactRecord) -> Result<(), Exclusion> {
    if record.email.is_empty() {
        return Err(Exclusion::MissingEmail);
    }
    if !record.email.contains('@') {
        return Err(Exclusion::InvalidEmail);
    }
    if record.professor_name.trim().is_empty() {
        return Err(Exclusion::MissingName);
    }
    if record.institution.trim().is_empty() {
        return Err(Exclusion::MissingInstitution);
    }
    if record.already_contacted {
        return Err(Exclusion::AlreadyContacted);
    }
    Ok(())
}

pub fn is_eligible(record: &ContactRecord) -> bool {
    check(record).is_ok()
}
