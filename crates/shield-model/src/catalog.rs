//! # Rule Catalogs
//!
//! One module per domain, one `const` [`RuleChain`] per field. Entities
//! reference these chains from their schemas; adding a field type means
//! adding one entry here.

use shield_core::{HashKind, Rule, RuleChain};

/// 32-character alphanumeric token shared by every identifier field.
pub const IDENTIFIER_RULES: &[Rule] = &[
    Rule::Required,
    Rule::TypedString { allowed: "" },
    Rule::Length { min: 32, max: 32 },
];

/// Generic identifier chain, used by [`Identifier`](crate::Identifier).
pub const IDENTIFIER: RuleChain = RuleChain::new("identifier", IDENTIFIER_RULES);

/// Type check shared by every boolean flag.
pub const FLAG_RULES: &[Rule] = &[Rule::Boolean];

/// Account fields.
pub mod account {
    use super::*;

    /// 32-character account identifier.
    pub const ACCOUNT_ID: RuleChain = RuleChain::new("account_id", IDENTIFIER_RULES);

    /// Display name.
    pub const NAME: RuleChain = RuleChain::new(
        "name",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " _-." },
            Rule::Length { min: 3, max: 255 },
        ],
    );

    /// Login e-mail.
    pub const EMAIL: RuleChain = RuleChain::new(
        "email",
        &[Rule::Required, Rule::TypedString { allowed: "@._-" }, Rule::Email],
    );

    /// Login password.
    pub const PASSWORD: RuleChain = RuleChain::new(
        "password",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "-_%~&@" },
            Rule::Length { min: 8, max: 32 },
        ],
    );

    /// Same rules as [`PASSWORD`].
    pub const CONFIRM_PASSWORD: RuleChain = RuleChain::new("confirm_password", PASSWORD.rules);

    /// Integer role code; membership is checked by parsing into `AccountRole`.
    pub const ROLE: RuleChain = RuleChain::new("role", &[Rule::Required, Rule::Integer]);

    /// Whether the account may log in.
    pub const IS_ACTIVE: RuleChain = RuleChain::new("is_active", FLAG_RULES);
}

/// Login credential fields.
pub mod authentication {
    use super::*;

    /// Same rules as the account e-mail.
    pub const EMAIL: RuleChain = RuleChain::new("email", super::account::EMAIL.rules);

    /// Same rules as the account password.
    pub const PASSWORD: RuleChain = RuleChain::new("password", super::account::PASSWORD.rules);
}

/// Blocking-order authorisation fields.
pub mod dda {
    use super::*;

    /// 32-character DDA identifier.
    pub const DDA_ID: RuleChain = RuleChain::new("dda_id", IDENTIFIER_RULES);

    /// Free-text description.
    pub const DESCRIPTION: RuleChain = RuleChain::new(
        "description",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " .,-_@" },
            Rule::Length { min: 3, max: 255 },
        ],
    );

    /// Order reference, e.g. `123/24/DDA/CA`.
    pub const INSTANCE: RuleChain =
        RuleChain::new("instance", &[Rule::Required, Rule::DdaInstance]);

    /// Whether the order is in force.
    pub const IS_ACTIVE: RuleChain = RuleChain::new("is_active", FLAG_RULES);
}

/// Ticket fields.
pub mod ticket {
    use super::*;

    /// 32-character ticket identifier.
    pub const TICKET_ID: RuleChain = RuleChain::new("ticket_id", IDENTIFIER_RULES);

    /// Optional free-text description.
    pub const DESCRIPTION: RuleChain = RuleChain::new(
        "description",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " .,-_@/'\"" },
            Rule::Length { min: 3, max: 255 },
        ],
    );

    /// Applied per element of the `fqdn` list.
    pub const FQDN: RuleChain = RuleChain::new("fqdn", &[Rule::Required, Rule::Fqdn]);

    /// Applied per element of the `ipv4` list.
    pub const IPV4: RuleChain = RuleChain::new("ipv4", &[Rule::Required, Rule::Ipv4]);

    /// Applied per element of the `ipv6` list.
    pub const IPV6: RuleChain = RuleChain::new("ipv6", &[Rule::Required, Rule::Ipv6]);
}

/// Ticket error report fields.
pub mod ticket_error {
    use super::*;

    /// 32-character report identifier.
    pub const TICKET_ERROR_ID: RuleChain = RuleChain::new("ticket_error_id", IDENTIFIER_RULES);
}

/// Ticket item and provider report fields.
pub mod ticket_item {
    use super::*;

    /// 32-character item identifier.
    pub const TICKET_ITEM_ID: RuleChain = RuleChain::new("ticket_item_id", IDENTIFIER_RULES);

    /// 32-character provider account identifier.
    pub const PROVIDER_ID: RuleChain = RuleChain::new("provider_id", IDENTIFIER_RULES);

    /// Presence only; membership is checked by parsing into `TicketItemGenre`.
    pub const GENRE: RuleChain = RuleChain::new("genre", &[Rule::Required]);

    /// Provider's free-text note.
    pub const NOTE: RuleChain = RuleChain::new(
        "note",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " .,-&/$€@\"" },
            Rule::Length { min: 3, max: 512 },
        ],
    );

    /// Time the provider acted.
    pub const TIMESTAMP: RuleChain =
        RuleChain::new("timestamp", &[Rule::Required, Rule::Iso8601]);

    /// Presence only; membership is checked by parsing the reason.
    pub const REASON: RuleChain = RuleChain::new("reason", &[Rule::Required]);

    /// Item flag: the item takes part in blocking.
    pub const IS_ACTIVE: RuleChain = RuleChain::new("is_active", FLAG_RULES);

    /// Item flag: the value repeats an earlier item.
    pub const IS_DUPLICATE: RuleChain = RuleChain::new("is_duplicate", FLAG_RULES);

    /// Item flag: the value matched a whitelist entry.
    pub const IS_WHITELISTED: RuleChain = RuleChain::new("is_whitelisted", FLAG_RULES);

    /// Item flag: the item was reported in error.
    pub const IS_ERROR: RuleChain = RuleChain::new("is_error", FLAG_RULES);
}

/// Whitelist entry fields.
pub mod whitelist {
    use super::*;

    /// Presence only; membership is checked by parsing into `WhitelistGenre`.
    pub const GENRE: RuleChain = RuleChain::new("genre", &[Rule::Required]);

    /// Registrar of a whitelisted FQDN.
    pub const REGISTRAR: RuleChain = RuleChain::new(
        "registrar",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " -" },
            Rule::Length { min: 3, max: 255 },
        ],
    );

    /// Autonomous system of a whitelisted address or network.
    pub const AS_CODE: RuleChain = RuleChain::new("as_code", &[Rule::Required, Rule::AsCode]);

    /// IPv4 network value.
    pub const CIDR_IPV4: RuleChain =
        RuleChain::new("cidr_ipv4", &[Rule::Required, Rule::CidrIpv4]);

    /// IPv6 network value.
    pub const CIDR_IPV6: RuleChain =
        RuleChain::new("cidr_ipv6", &[Rule::Required, Rule::CidrIpv6]);

    /// Whether the entry is in force.
    pub const IS_ACTIVE: RuleChain = RuleChain::new("is_active", FLAG_RULES);
}

/// Forensic evidence fields.
pub mod forensic {
    use super::*;

    /// Archive file name.
    pub const ARCHIVE_NAME: RuleChain = RuleChain::new(
        "name",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " .-_" },
            Rule::Length { min: 6, max: 320 },
        ],
    );

    /// Algorithm name, before it is parsed into `HashKind`.
    pub const HASH_TYPE: RuleChain =
        RuleChain::new("hash_type", &[Rule::Required, Rule::TypedString { allowed: "" }]);

    /// SHA-256 digest.
    pub const SHA256: RuleChain = RuleChain::new(
        "hash_string",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "" },
            Rule::HashDigest(HashKind::Sha256),
        ],
    );

    /// SHA-384 digest.
    pub const SHA384: RuleChain = RuleChain::new(
        "hash_string",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "" },
            Rule::HashDigest(HashKind::Sha384),
        ],
    );

    /// SHA-512 digest.
    pub const SHA512: RuleChain = RuleChain::new(
        "hash_string",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "" },
            Rule::HashDigest(HashKind::Sha512),
        ],
    );

    /// BLAKE2b digest.
    pub const BLAKE2B: RuleChain = RuleChain::new(
        "hash_string",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "" },
            Rule::HashDigest(HashKind::Blake2b),
        ],
    );

    /// BLAKE2s digest.
    pub const BLAKE2S: RuleChain = RuleChain::new(
        "hash_string",
        &[
            Rule::Required,
            Rule::TypedString { allowed: "" },
            Rule::HashDigest(HashKind::Blake2s),
        ],
    );

    /// Digest chain for a given algorithm.
    pub const fn hash_chain(kind: HashKind) -> &'static RuleChain {
        match kind {
            HashKind::Sha256 => &SHA256,
            HashKind::Sha384 => &SHA384,
            HashKind::Sha512 => &SHA512,
            HashKind::Blake2b => &BLAKE2B,
            HashKind::Blake2s => &BLAKE2S,
        }
    }
}

/// Log record fields.
pub mod log {
    use super::*;

    /// Log line text.
    pub const MESSAGE: RuleChain =
        RuleChain::new("message", &[Rule::Required, Rule::Length { min: 3, max: 500 }]);
}
