//! Sub-account management.
//!
//! Field reference: <https://api.elasticemail.com/public/help#Account_AddSubAccount>

use crate::options::CallOptions;
use crate::params::{merge_overrides, serialize_fields, Field, ParamMap, ParamValue, Presence, ToParams};
use crate::response::Response;
use crate::rest::Client;

/// What a sub-account may send through.
///
/// <https://api.elasticemail.com/public/help#classes_SendingPermission>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendingPermission {
    #[default]
    None,
    Smtp,
    HttpApi,
    SmtpAndHttpApi,
    Interface,
    SmtpAndInterface,
    HttpApiAndInterface,
    All,
}

impl SendingPermission {
    /// Numeric code the API uses
    pub fn code(self) -> i64 {
        match self {
            SendingPermission::None => 0,
            SendingPermission::Smtp => 1,
            SendingPermission::HttpApi => 2,
            SendingPermission::SmtpAndHttpApi => 3,
            SendingPermission::Interface => 4,
            SendingPermission::SmtpAndInterface => 5,
            SendingPermission::HttpApiAndInterface => 6,
            SendingPermission::All => 255,
        }
    }
}

/// Settings of a sub-account. Every field is always sent.
#[derive(Debug, Clone, Default)]
pub struct Subaccount {
    pub email: String,
    pub password: String,
    /// Defaults to `password` when left empty on creation
    pub confirm_password: String,
    pub daily_send_limit: i64,
    /// In MB
    pub email_size_limit: i64,
    pub enable_contact_features: bool,
    pub enable_litmus_test: bool,
    pub enable_private_ip_request: bool,
    pub max_contacts: i64,
    pub pool_name: String,
    pub requires_email_credits: bool,
    pub requires_litmus_credits: bool,
    pub send_activation: bool,
    pub sending_permission: SendingPermission,
}

static SUBACCOUNT_FIELDS: &[Field<Subaccount>] = &[
    Field { key: "email", presence: Presence::Always, get: |s| (&s.email).into() },
    Field { key: "password", presence: Presence::Always, get: |s| (&s.password).into() },
    Field { key: "confirmPassword", presence: Presence::Always, get: |s| (&s.confirm_password).into() },
    Field { key: "dailySendLimit", presence: Presence::Always, get: |s| s.daily_send_limit.into() },
    Field { key: "emailSizeLimit", presence: Presence::Always, get: |s| s.email_size_limit.into() },
    Field { key: "enableContactFeatures", presence: Presence::Always, get: |s| s.enable_contact_features.into() },
    Field { key: "enableLitmusTest", presence: Presence::Always, get: |s| s.enable_litmus_test.into() },
    Field { key: "enablePrivateIPRequest", presence: Presence::Always, get: |s| s.enable_private_ip_request.into() },
    Field { key: "maxContacts", presence: Presence::Always, get: |s| s.max_contacts.into() },
    Field { key: "poolName", presence: Presence::Always, get: |s| (&s.pool_name).into() },
    Field { key: "requiresEmailCredits", presence: Presence::Always, get: |s| s.requires_email_credits.into() },
    Field { key: "requiresLitmusCredits", presence: Presence::Always, get: |s| s.requires_litmus_credits.into() },
    Field { key: "sendActivation", presence: Presence::Always, get: |s| s.send_activation.into() },
    Field { key: "sendingPermission", presence: Presence::Always, get: |s| ParamValue::Int(s.sending_permission.code()) },
];

impl ToParams for Subaccount {
    fn to_params(&self) -> ParamMap {
        serialize_fields(self, SUBACCOUNT_FIELDS)
    }
}

/// Identifies an existing sub-account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubAccountRef {
    Email(String),
    PublicAccountId(String),
}

impl ToParams for SubAccountRef {
    fn to_params(&self) -> ParamMap {
        let (key, value) = match self {
            SubAccountRef::Email(email) => ("subAccountEmail", email),
            SubAccountRef::PublicAccountId(id) => ("publicAccountID", id),
        };
        ParamMap::from([(key.to_string(), value.clone())])
    }
}

impl Client {
    /// Create a sub-account. On success the payload is its API key.
    pub fn add_subaccount(&self, sub: &Subaccount) -> Response {
        self.add_subaccount_with(sub, &CallOptions::default())
    }

    /// [`add_subaccount`](Client::add_subaccount) with per-call options
    pub fn add_subaccount_with(&self, sub: &Subaccount, opts: &CallOptions) -> Response {
        let mut params = sub.to_params();
        if sub.confirm_password.is_empty() {
            params.insert("confirmPassword".to_string(), sub.password.clone());
        }
        self.get("account/addsubaccount", params, opts)
    }

    /// Delete a sub-account
    pub fn delete_subaccount(&self, target: &SubAccountRef) -> Response {
        self.delete_subaccount_with(target, &CallOptions::default())
    }

    /// [`delete_subaccount`](Client::delete_subaccount) with per-call options
    pub fn delete_subaccount_with(&self, target: &SubAccountRef, opts: &CallOptions) -> Response {
        self.get("account/deletesubaccount", target, opts)
    }

    /// Update a sub-account's settings from `sub`. Pairs in `overrides`
    /// replace same-named fields derived from `sub`.
    pub fn update_subaccount_settings(
        &self,
        target: &SubAccountRef,
        sub: &Subaccount,
        overrides: &ParamMap,
    ) -> Response {
        self.update_subaccount_settings_with(target, sub, overrides, &CallOptions::default())
    }

    /// [`update_subaccount_settings`](Client::update_subaccount_settings) with per-call options
    pub fn update_subaccount_settings_with(
        &self,
        target: &SubAccountRef,
        sub: &Subaccount,
        overrides: &ParamMap,
        opts: &CallOptions,
    ) -> Response {
        let params = merge_overrides(sub.to_params(), &target.to_params());
        let params = merge_overrides(params, overrides);
        self.get("account/updatesubaccountsettings", params, opts)
    }

    /// Look up a sub-account's API key, returned as the payload
    pub fn get_subaccount_api_key(&self, target: &SubAccountRef) -> Response {
        self.get_subaccount_api_key_with(target, &CallOptions::default())
    }

    /// [`get_subaccount_api_key`](Client::get_subaccount_api_key) with per-call options
    pub fn get_subaccount_api_key_with(&self, target: &SubAccountRef, opts: &CallOptions) -> Response {
        self.get("account/getsubaccountapikey", target, opts)
    }
}
