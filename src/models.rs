use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANNOUNCEMENT_BASE_URL: &str =
    "https://www.idx.co.id/primary/ListedCompany/GetAnnouncement";
pub const ANNOUNCEMENT_KEYWORD: &str = "Pemegang Saham di atas 5%";
pub const ATTACHMENT_MARKER: &str = "_lamp";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Listing response of the announcement endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnouncementListing {
    #[serde(rename = "Replies", default)]
    pub replies: Vec<AnnouncementReply>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnouncementReply {
    #[serde(rename = "pengumuman")]
    pub announcement: Announcement,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Announcement {
    /// `YYYY-MM-DDTHH:MM:SS`; only the date part is compared.
    #[serde(rename = "TglPengumuman", default)]
    pub published_at: String,
    #[serde(rename = "JudulPengumuman", default)]
    pub title: String,
}

impl Announcement {
    pub fn published_date(&self) -> Option<NaiveDate> {
        let date = self.published_at.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    #[serde(rename = "OriginalFilename", default)]
    pub original_filename: String,
    #[serde(rename = "FullSavePath", default)]
    pub full_save_path: String,
}

/// The attachment picked for a target date, with its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub file_name: String,
    pub date: NaiveDate,
    pub bytes: Vec<u8>,
}

impl FetchedDocument {
    /// File name without the `.pdf` extension.
    pub fn base_name(&self) -> &str {
        let name = self.file_name.as_str();
        match name.len().checked_sub(4) {
            Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") => {
                &name[..cut]
            }
            _ => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Uploaded {
        document: String,
        full_rows: usize,
        changed_rows: usize,
        keys: Vec<String>,
    },
    NoData {
        document: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateReport {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl DateReport {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
