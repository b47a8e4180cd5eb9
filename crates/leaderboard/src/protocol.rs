//! Protocol module - JSON message types for the leaderboard service
//!
//! Line-delimited JSON: one request object per line, one response object per
//! line. Every message carries `type` and the request's `seq`, which is echoed
//! back so clients can match responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::StoreError;

/// Identity a score is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Persist one final score.
    ///
    /// `points` is kept as raw JSON so that a non-numeric value is reported as
    /// an invalid score rather than a malformed request.
    Submit {
        seq: u64,
        user: UserInfo,
        points: Value,
    },
    /// List the best scores, at most 10.
    Top {
        seq: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
}

impl Request {
    pub fn submit(seq: u64, user: UserInfo, points: u32) -> Self {
        Request::Submit {
            seq,
            user,
            points: Value::from(points),
        }
    }

    pub fn top(seq: u64, limit: usize) -> Self {
        Request::Top {
            seq,
            limit: Some(limit),
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            Request::Submit { seq, .. } | Request::Top { seq, .. } => *seq,
        }
    }
}

// ============== Server -> Client Messages ==============

/// Stored score as returned to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub points: u32,
    pub user_id: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
}

/// Public view of the submitting user; the email is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: u64,
    pub points: u32,
    pub created_at: u64,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No caller identity.
    Unauthorized,
    /// Points missing, not a number, negative or out of range.
    InvalidScore,
    /// Line is not a valid request.
    InvalidRequest,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidScore => "invalid_score",
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::Internal => "internal",
        }
    }
}

impl From<&StoreError> for ErrorCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::Unauthorized => ErrorCode::Unauthorized,
            StoreError::InvalidScore(_) => ErrorCode::InvalidScore,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ack {
        seq: u64,
        record: ScoreRecord,
    },
    Scores {
        seq: u64,
        scores: Vec<ScoreEntry>,
    },
    Error {
        seq: u64,
        code: ErrorCode,
        message: String,
    },
}

impl Response {
    pub fn seq(&self) -> u64 {
        match self {
            Response::Ack { seq, .. } | Response::Scores { seq, .. } | Response::Error { seq, .. } => {
                *seq
            }
        }
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> Response {
    Response::Error {
        seq,
        code,
        message: message.to_string(),
    }
}

/// Pull `"seq": <digits>` out of a line that may not be valid JSON, so error
/// replies can still be correlated. Returns 0 when absent.
pub fn extract_seq_best_effort(s: &str) -> u64 {
    let Some(start) = s.find("\"seq\"") else {
        return 0;
    };
    let after_key = &s[start + 5..];
    let Some(colon) = after_key.find(':') else {
        return 0;
    };
    let rest = after_key[colon + 1..].trim_start();
    let end = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    rest[..end].parse().unwrap_or(0)
}

/// Parse one request line. A failure is returned as the `invalid_request`
/// error to send back.
pub fn parse_request(line: &str) -> Result<Request, Response> {
    serde_json::from_str(line).map_err(|e| {
        create_error(
            extract_seq_best_effort(line),
            ErrorCode::InvalidRequest,
            &e.to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_submit() {
        let line = r#"{"type":"submit","seq":4,"user":{"id":"u1","name":"Ada"},"points":120}"#;
        let req = parse_request(line).unwrap();
        assert_eq!(req.seq(), 4);
        match req {
            Request::Submit { user, points, .. } => {
                assert_eq!(user.id, "u1");
                assert_eq!(user.name.as_deref(), Some("Ada"));
                assert_eq!(user.email, None);
                assert_eq!(points, json!(120));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_parse_top_without_limit() {
        let req = parse_request(r#"{"type":"top","seq":1}"#).unwrap();
        assert_eq!(req, Request::Top { seq: 1, limit: None });
    }

    #[test]
    fn test_malformed_line_keeps_seq() {
        let err = parse_request(r#"{"type":"launch","seq":77}"#).unwrap_err();
        assert_eq!(err.seq(), 77);
        assert!(matches!(
            err,
            Response::Error {
                code: ErrorCode::InvalidRequest,
                ..
            }
        ));

        assert_eq!(parse_request("not json").unwrap_err().seq(), 0);
    }

    #[test]
    fn test_error_wire_format() {
        let err = create_error(9, ErrorCode::InvalidScore, "Invalid score");
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(
            v,
            json!({"type":"error","seq":9,"code":"invalid_score","message":"Invalid score"})
        );
    }

    #[test]
    fn test_scores_wire_format() {
        let resp = Response::Scores {
            seq: 2,
            scores: vec![ScoreEntry {
                id: 1,
                points: 500,
                created_at: 1000,
                user: PublicUser {
                    name: None,
                    email: Some("ada***@example.com".to_string()),
                },
            }],
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["type"], "scores");
        assert_eq!(v["scores"][0]["user"]["name"], Value::Null);
        assert_eq!(v["scores"][0]["user"]["email"], "ada***@example.com");
    }
}
