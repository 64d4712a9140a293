use crate::domain::model::{ContactRecord, OutreachMessage, TemplateVariant};

pub const OUTREACH_SUBJECT: &str = "Inquiry About Research Opportunities in Your Group";

/// 有論文旗標且標題有效時才引用論文
pub fn variant(record: &ContactRecord) -> TemplateVariant {
    match (&record.paper_title, record.has_paper) {
        (Some(_), true) => TemplateVariant::PaperKnown,
        _ => TemplateVariant::NoPaperCited,
    }
}

pub fn compose(record: &ContactRecord, sender_name: Option<&str>) -> OutreachMessage {
    let sender = sender_name.unwrap_or("");
    let body = match (variant(record), record.paper_title.as_deref()) {
        (TemplateVariant::PaperKnown, Some(title)) => paper_known_body(record, title, sender),
        _ => no_paper_body(record, sender),
    };

    OutreachMessage {
        subject: OUTREACH_SUBJECT.to_string(),
        body,
    }
}

fn paper_known_body(record: &ContactRecord, title: &str, sender: &str) -> String {
    format!(
        "Dear Professor {name},\n\
         \n\
         I hope this message finds you well. My name is {sender}, and I recently read \
         your paper \"{title}\". Your work in {area} at {institution} has strongly \
         shaped my own interests, and the questions raised in that paper are exactly \
         the kind I hope to pursue.\n\
         \n\
         I am writing to ask whether there might be an opportunity to contribute to \
         research in your group. I would be grateful for the chance to discuss how I \
         could support your ongoing work in {area}.\n\
         \n\
         Thank you for your time and consideration.\n\
         \n\
         Best regards,\n\
         {sender}\n",
        name = record.professor_name,
        sender = sender,
        title = title,
        area = record.research_area,
        institution = record.institution,
    )
}

fn no_paper_body(record: &ContactRecord, sender: &str) -> String {
    format!(
        "Dear Professor {name},\n\
         \n\
         I hope this message finds you well. My name is {sender}, and I have been \
         following the research in {area} coming out of your group at {institution}. \
         I greatly admire the direction and quality of your work, and it has strongly \
         shaped my own interests.\n\
         \n\
         I am writing to ask whether there might be an opportunity to contribute to \
         research in your group. I would be grateful for the chance to discuss how I \
         could support your ongoing work in {area}.\n\
         \n\
         Thank you for your time and consideration.\n\
         \n\
         Best regards,\n\
         {sender}\n",
        name = record.professor_name,
        sender = sender,
        area = record.research_area,
        institution = record.institution,
    )
}
