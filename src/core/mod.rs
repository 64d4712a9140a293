pub mod campaign;
pub mod composer;
pub mod eligibility;

pub use crate::domain::model::{
    CampaignReport, CampaignTally, ContactRecord, ContactRow, OutreachMessage, RowOutcome,
    TemplateVariant,
};
pub use crate::domain::ports::{ContactStore, MailTransport, Pacer};
pub use crate::utils::error::Result;
