//! Locating the disclosure attachment for a date. Network access stays behind
//! [`Transport`]; this module only builds queries and picks attachments.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::error::EtlError;
use crate::models::{
    ANNOUNCEMENT_KEYWORD, ATTACHMENT_MARKER, AnnouncementListing, Attachment, FetchedDocument,
};
use crate::schedule::compact_date;

static LOCAL_ATTACHMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<date>\d{8}).*_lamp.*\.pdf$")
        .expect("hardcoded attachment file name regex is valid")
});

pub trait Transport {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, EtlError>;
}

pub trait DocumentSource {
    fn fetch(&self, date: NaiveDate) -> Result<FetchedDocument, EtlError>;
}

/// Listing query for announcements published from `date` through a week
/// later.
pub fn announcement_query_url(base: &str, date: NaiveDate) -> Result<Url, EtlError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("kodeEmiten", "")
        .append_pair("emitenType", "*")
        .append_pair("indexFrom", "0")
        .append_pair("pageSize", "10")
        .append_pair("dateFrom", &compact_date(date))
        .append_pair("dateTo", &compact_date(date + Duration::days(7)))
        .append_pair("lang", "id")
        .append_pair("keyword", ANNOUNCEMENT_KEYWORD);
    Ok(url)
}

fn is_lamp_file(name: &str) -> bool {
    name.to_lowercase().contains(ATTACHMENT_MARKER)
}

/// First `_lamp` attachment, newest announcement first, among announcements
/// published exactly on `date`.
pub fn select_lamp_attachment(
    listing: &AnnouncementListing,
    date: NaiveDate,
) -> Result<&Attachment, EtlError> {
    if listing.replies.is_empty() {
        return Err(EtlError::NotFound(
            "no announcements found for the given date range".to_string(),
        ));
    }

    let mut replies = listing.replies.iter().collect::<Vec<_>>();
    replies.sort_by(|left, right| {
        right
            .announcement
            .published_at
            .cmp(&left.announcement.published_at)
    });

    replies
        .into_iter()
        .filter(|reply| reply.announcement.published_date() == Some(date))
        .flat_map(|reply| reply.attachments.iter())
        .find(|attachment| is_lamp_file(&attachment.original_filename))
        .ok_or_else(|| {
            EtlError::NotFound(format!(
                "no {ATTACHMENT_MARKER} attachment announced on {date}"
            ))
        })
}

#[derive(Debug, Clone)]
pub struct AnnouncementSource<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> AnnouncementSource<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> DocumentSource for AnnouncementSource<T> {
    fn fetch(&self, date: NaiveDate) -> Result<FetchedDocument, EtlError> {
        let query = announcement_query_url(&self.base_url, date)?;
        debug!(url = %query, "querying announcements");
        let body = self.transport.get_bytes(query.as_str())?;
        let listing = serde_json::from_slice::<AnnouncementListing>(&body)?;

        let attachment = select_lamp_attachment(&listing, date)?;
        let pdf_url = query.join(&attachment.full_save_path)?;
        info!(file = %attachment.original_filename, %date, "downloading attachment");

        let bytes = self.transport.get_bytes(pdf_url.as_str())?;
        if bytes.is_empty() {
            return Err(EtlError::Upstream("fetched PDF is empty".to_string()));
        }

        Ok(FetchedDocument {
            file_name: attachment.original_filename.clone(),
            date,
            bytes,
        })
    }
}

/// Already-downloaded attachments named `YYYYMMDD…_lamp….pdf`.
#[derive(Debug, Clone)]
pub struct LocalDirSource {
    pub root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn decode_file_name(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

impl DocumentSource for LocalDirSource {
    fn fetch(&self, date: NaiveDate) -> Result<FetchedDocument, EtlError> {
        let wanted = compact_date(date);

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let raw = entry.file_name().to_string_lossy().into_owned();
            let decoded = decode_file_name(&raw);
            let matches_date = LOCAL_ATTACHMENT
                .captures(&decoded)
                .and_then(|capture| capture.name("date"))
                .is_some_and(|found| found.as_str() == wanted);
            if matches_date {
                candidates.push((decoded, entry.path()));
            }
        }

        candidates.sort();
        let Some((file_name, path)) = candidates.pop() else {
            return Err(EtlError::NotFound(format!(
                "no {ATTACHMENT_MARKER} file for {wanted} in '{}'",
                self.root.display()
            )));
        };

        debug!(path = %path.display(), "reading local attachment");
        let bytes = std::fs::read(&path)?;
        Ok(FetchedDocument {
            file_name,
            date,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{announcement_query_url, decode_file_name, select_lamp_attachment};
    use crate::models::{Announcement, AnnouncementListing, AnnouncementReply, Attachment};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn reply(published_at: &str, files: &[&str]) -> AnnouncementReply {
        AnnouncementReply {
            announcement: Announcement {
                published_at: published_at.to_string(),
                title: "Pemegang Saham di atas 5%".to_string(),
            },
            attachments: files
                .iter()
                .map(|name| Attachment {
                    original_filename: (*name).to_string(),
                    full_save_path: format!("https://example.test/{name}"),
                })
                .collect(),
        }
    }

    #[test]
    fn query_covers_a_week_from_target_date() {
        let url = announcement_query_url(
            "https://www.idx.co.id/primary/ListedCompany/GetAnnouncement",
            date(2025, 12, 29),
        )
        .expect("query url");

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(get("dateFrom"), Some("20251229"));
        assert_eq!(get("dateTo"), Some("20260105"));
        assert_eq!(get("keyword"), Some("Pemegang Saham di atas 5%"));
        assert_eq!(get("pageSize"), Some("10"));
        assert_eq!(get("lang"), Some("id"));
    }

    #[test]
    fn picks_lamp_attachment_of_target_date() {
        let listing = AnnouncementListing {
            replies: vec![
                reply("2025-01-16T08:00:00", &["20250116_Pemegang_Lamp.pdf"]),
                reply(
                    "2025-01-15T17:02:11",
                    &["20250115_Pengumuman.pdf", "20250115_Pemegang_lamp.pdf"],
                ),
            ],
        };

        let attachment =
            select_lamp_attachment(&listing, date(2025, 1, 15)).expect("attachment found");
        assert_eq!(attachment.original_filename, "20250115_Pemegang_lamp.pdf");

        let newer = select_lamp_attachment(&listing, date(2025, 1, 16)).expect("case-insensitive");
        assert_eq!(newer.original_filename, "20250116_Pemegang_Lamp.pdf");
    }

    #[test]
    fn missing_attachment_is_not_found() {
        let listing = AnnouncementListing {
            replies: vec![reply("2025-01-15T17:02:11", &["20250115_Pengumuman.pdf"])],
        };
        let err = select_lamp_attachment(&listing, date(2025, 1, 15)).expect_err("no lamp file");
        assert_eq!(err.code(), "not_found");

        let err = select_lamp_attachment(&AnnouncementListing::default(), date(2025, 1, 15))
            .expect_err("no announcements");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn decodes_percent_escaped_file_names() {
        assert_eq!(
            decode_file_name("20250115%20Pemegang_lamp.pdf"),
            "20250115 Pemegang_lamp.pdf"
        );
    }
}
