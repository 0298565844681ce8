//! # Google Calendar Client
//!
//! Calendar v3 REST calls over `reqwest` with a caller-supplied bearer token.
//! Token acquisition and refresh happen outside this crate.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use super::client::{CalendarClient, CalendarEvent, ReminderEvent};
use crate::core::CalendarError;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Events per list page (API maximum is 2500)
const PAGE_SIZE: &str = "250";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPage {
    #[serde(default)]
    items: Vec<CalendarEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Clone)]
pub struct GoogleCalendar {
    client: Client,
    events_url: Url,
    access_token: String,
}

impl GoogleCalendar {
    pub fn new(api_base: &str, calendar_id: &str, access_token: &str) -> Result<Self, CalendarError> {
        Self::with_client(Client::new(), api_base, calendar_id, access_token)
    }

    /// Use a preconfigured `reqwest` client (proxies, timeouts)
    pub fn with_client(
        client: Client,
        api_base: &str,
        calendar_id: &str,
        access_token: &str,
    ) -> Result<Self, CalendarError> {
        Ok(GoogleCalendar {
            client,
            events_url: events_url(api_base, calendar_id)?,
            access_token: access_token.to_string(),
        })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    fn event_url(&self, event_id: &str) -> Result<Url, CalendarError> {
        let mut url = self.events_url.clone();
        url.path_segments_mut()
            .map_err(|_| CalendarError::Config(format!("{} cannot take a path", self.events_url)))?
            .push(event_id);
        Ok(url)
    }
}

/// `{api_base}/calendars/{calendar_id}/events`, with the id percent-encoded
fn events_url(api_base: &str, calendar_id: &str) -> Result<Url, CalendarError> {
    let mut url = Url::parse(api_base)
        .map_err(|e| CalendarError::Config(format!("invalid API base '{api_base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CalendarError::Config(format!("API base '{api_base}' cannot take a path")))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

async fn ensure_success(operation: &'static str, response: Response) -> Result<Response, CalendarError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CalendarError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CalendarError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl CalendarClient for GoogleCalendar {
    async fn list_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.events_url.clone())
                .bearer_auth(&self.access_token)
                .query(&[("maxResults", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = ensure_success("list", request.send().await?).await?;
            let page: EventPage = decode(response).await?;
            debug!("Listed {} events", page.items.len());
            events.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(events)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let response = self
            .client
            .delete(self.event_url(event_id)?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(CalendarError::NotFound(event_id.to_string()));
        }
        ensure_success("delete", response).await?;
        Ok(())
    }

    async fn insert_event(&self, event: &ReminderEvent) -> Result<CalendarEvent, CalendarError> {
        let response = self
            .client
            .post(self.events_url.clone())
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        let response = ensure_success("insert", response).await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_API_BASE;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Maps a request head to a status and JSON body
    type Route = fn(&str) -> (u16, &'static str);

    /// Serve canned responses on 127.0.0.1 and return an API base pointing at it
    async fn stub_api(route: Route) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(answer(stream, route));
            }
        });
        format!("http://{addr}/calendar/v3")
    }

    fn local_calendar(base: &str, token: &str) -> GoogleCalendar {
        let client = Client::builder().no_proxy().build().unwrap();
        GoogleCalendar::with_client(client, base, "primary", token).unwrap()
    }

    async fn answer(mut stream: TcpStream, route: Route) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let (status, body) = if head.to_lowercase().contains("authorization: bearer token") {
            route(&head)
        } else {
            (401, r#"{"error": "unauthorized"}"#)
        };
        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    }

    fn calendar_api(head: &str) -> (u16, &'static str) {
        let request_line = head.lines().next().unwrap_or_default();
        if request_line.starts_with("GET ") {
            if request_line.contains("pageToken=p2") {
                (200, r#"{"items": [{"id": "c", "summary": "Weight"}]}"#)
            } else {
                (
                    200,
                    r#"{"items": [{"id": "a", "summary": "Weight"}, {"id": "b", "summary": "Dentist"}], "nextPageToken": "p2"}"#,
                )
            }
        } else if request_line.starts_with("DELETE ") {
            if request_line.contains("/events/missing ") {
                (404, r#"{"error": "not found"}"#)
            } else if request_line.contains("/events/deleted ") {
                (410, r#"{"error": "gone"}"#)
            } else {
                (204, "")
            }
        } else if request_line.starts_with("POST ") {
            (403, r#"{"error": "forbidden"}"#)
        } else {
            (405, "")
        }
    }

    #[test]
    fn test_events_url_encodes_calendar_id() {
        let calendar =
            GoogleCalendar::new(DEFAULT_API_BASE, "abc123@group.calendar.google.com", "token")
                .unwrap();
        assert_eq!(
            calendar.events_url().as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/abc123@group.calendar.google.com/events"
        );

        let event = calendar.event_url("evt/1").unwrap();
        assert!(event.as_str().ends_with("/events/evt%2F1"));
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let url = events_url("http://localhost:8080/calendar/v3/", "primary").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/calendar/v3/calendars/primary/events"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(matches!(
            GoogleCalendar::new("not a url", "primary", "token"),
            Err(CalendarError::Config(_))
        ));
        assert!(matches!(
            GoogleCalendar::new("mailto:someone@example.test", "primary", "token"),
            Err(CalendarError::Config(_))
        ));
    }

    #[test]
    fn test_event_page_decoding() {
        let page: EventPage = serde_json::from_str(
            r#"{
                "kind": "calendar#events",
                "items": [
                    {"id": "a", "summary": "Weight"},
                    {"id": "b", "summary": "Dentist"}
                ],
                "nextPageToken": "p2"
            }"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("p2"));

        let last: EventPage = serde_json::from_str(r#"{"kind": "calendar#events"}"#).unwrap();
        assert!(last.items.is_empty());
        assert!(last.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let base = stub_api(calendar_api).await;
        let calendar = local_calendar(&base, "token");

        let events = calendar.list_events().await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_maps_missing_events_to_not_found() {
        let base = stub_api(calendar_api).await;
        let calendar = local_calendar(&base, "token");

        calendar.delete_event("live").await.unwrap();
        assert!(matches!(
            calendar.delete_event("missing").await,
            Err(CalendarError::NotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            calendar.delete_event("deleted").await,
            Err(CalendarError::NotFound(id)) if id == "deleted"
        ));
    }

    #[tokio::test]
    async fn test_insert_rejection_surfaces_status() {
        let base = stub_api(calendar_api).await;
        let calendar = local_calendar(&base, "token");
        let at = New_York.with_ymd_and_hms(2026, 10, 19, 17, 12, 30).unwrap();

        let err = calendar
            .insert_event(&ReminderEvent::at("Weight", &at))
            .await
            .unwrap_err();
        match err {
            CalendarError::Status {
                operation,
                status,
                body,
            } => {
                assert_eq!(operation, "insert");
                assert_eq!(status, 403);
                assert!(body.contains("forbidden"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_token_is_a_status_error() {
        let base = stub_api(calendar_api).await;
        let calendar = local_calendar(&base, "other");

        assert!(matches!(
            calendar.list_events().await,
            Err(CalendarError::Status { status: 401, .. })
        ));
    }
}
