//! Sending email and checking on it.
//!
//! Field reference: <https://api.elasticemail.com/public/help#Email_Send>

use crate::options::CallOptions;
use crate::params::{serialize_fields, Field, ParamMap, ParamValue, Presence, ToParams};
use crate::response::Response;
use crate::rest::Client;
use std::collections::BTreeMap;

/// Content transfer encoding for the message body.
///
/// <https://api.elasticemail.com/public/help#classes_EncodingType>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingType {
    UserProvided,
    #[default]
    None,
    Raw7bit,
    Raw8bit,
    QuotedPrintable,
    Base64,
    Uue,
}

impl EncodingType {
    /// Numeric code the API uses
    pub fn code(self) -> i64 {
        match self {
            EncodingType::UserProvided => -1,
            EncodingType::None => 0,
            EncodingType::Raw7bit => 1,
            EncodingType::Raw8bit => 2,
            EncodingType::QuotedPrintable => 3,
            EncodingType::Base64 => 4,
            EncodingType::Uue => 5,
        }
    }
}

/// An email to submit. Empty fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct Email {
    pub body_html: String,
    pub body_text: String,
    pub channel: String,
    pub charset: String,
    pub charset_body_html: String,
    pub charset_body_text: String,
    pub encoding_type: EncodingType,
    pub from: String,
    pub from_name: String,
    pub is_transactional: bool,
    pub lists: String,
    pub merge: String,
    pub msg_bcc: String,
    pub msg_cc: String,
    pub msg_from: String,
    pub msg_from_name: String,
    pub msg_to: String,
    pub pool_name: String,
    pub reply_to: String,
    pub reply_to_name: String,
    pub segments: String,
    pub sender: String,
    pub sender_name: String,
    pub subject: String,
    pub template: String,
    pub time_offset_minutes: String,
    pub to: String,
    /// Postback headers, also added to the email's own headers
    pub custom_headers: BTreeMap<String, String>,
}

macro_rules! omit_empty {
    ($key:literal, $field:ident) => {
        Field { key: $key, presence: Presence::OmitEmpty, get: |e: &Email| ParamValue::from(&e.$field) }
    };
}

static EMAIL_FIELDS: &[Field<Email>] = &[
    omit_empty!("bodyHtml", body_html),
    omit_empty!("bodyText", body_text),
    omit_empty!("channel", channel),
    omit_empty!("charset", charset),
    omit_empty!("charsetBodyHtml", charset_body_html),
    omit_empty!("charsetBodyText", charset_body_text),
    Field { key: "encodingType", presence: Presence::OmitEmpty, get: |e| ParamValue::Int(e.encoding_type.code()) },
    omit_empty!("from", from),
    omit_empty!("fromName", from_name),
    Field { key: "isTransactional", presence: Presence::OmitEmpty, get: |e| e.is_transactional.into() },
    omit_empty!("lists", lists),
    omit_empty!("merge", merge),
    omit_empty!("msgBcc", msg_bcc),
    omit_empty!("msgCC", msg_cc),
    omit_empty!("msgFrom", msg_from),
    omit_empty!("msgFromName", msg_from_name),
    omit_empty!("msgTo", msg_to),
    omit_empty!("poolName", pool_name),
    omit_empty!("replyTo", reply_to),
    omit_empty!("replyToName", reply_to_name),
    omit_empty!("segments", segments),
    omit_empty!("sender", sender),
    omit_empty!("senderName", sender_name),
    omit_empty!("subject", subject),
    omit_empty!("template", template),
    omit_empty!("timeOffSetMinutes", time_offset_minutes),
    omit_empty!("to", to),
];

impl ToParams for Email {
    fn to_params(&self) -> ParamMap {
        let mut params = serialize_fields(self, EMAIL_FIELDS);
        for (name, value) in &self.custom_headers {
            params.insert(
                format!("headers_postback-{}", name),
                format!("postback-{}: {}", name, value),
            );
        }
        params
    }
}

fn message_params(message_id: &str) -> ParamMap {
    ParamMap::from([("messageID".to_string(), message_id.to_string())])
}

impl Client {
    /// Submit an email. The default maximum size, attachments included, is 10 MB.
    pub fn send(&self, email: &Email) -> Response {
        self.send_with(email, &CallOptions::default())
    }

    /// [`send`](Client::send) with per-call options
    pub fn send_with(&self, email: &Email, opts: &CallOptions) -> Response {
        self.post("email/send", email, opts)
    }

    /// Detailed status of a single sent message
    pub fn status(&self, message_id: &str) -> Response {
        self.status_with(message_id, &CallOptions::default())
    }

    /// [`status`](Client::status) with per-call options
    pub fn status_with(&self, message_id: &str, opts: &CallOptions) -> Response {
        self.get("email/status", message_params(message_id), opts)
    }

    /// Content of a sent message
    pub fn view(&self, message_id: &str) -> Response {
        self.view_with(message_id, &CallOptions::default())
    }

    /// [`view`](Client::view) with per-call options
    pub fn view_with(&self, message_id: &str, opts: &CallOptions) -> Response {
        self.get("email/view", message_params(message_id), opts)
    }
}
