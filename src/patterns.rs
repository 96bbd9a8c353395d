//! Column-name classifier.
//!
//! Each role owns a small set of case-insensitive patterns. A name may match
//! several roles; the returned set iterates in role precedence order.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::classify::ColumnRole;

struct RolePattern {
    role: ColumnRole,
    patterns: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("built-in column pattern must compile"))
        .collect()
}

static ROLE_PATTERNS: LazyLock<Vec<RolePattern>> = LazyLock::new(|| {
    vec![
        RolePattern {
            role: ColumnRole::Identifier,
            patterns: compile(&[
                // `id` as its own token: id, ID, customer_id, "Order ID", id_no
                r"(?i)(?:^|[^a-z])id(?:[^a-z]|$)",
                // camelCase suffix or prefix: customerId, userID, IDNumber, IdCard
                r"[a-z0-9](?:Id|ID)(?:[A-Z_]|$)",
                r"^(?:Id|ID)[A-Z_]",
                r"(?i)(?:^|[^a-z])(?:nik|npwp|ssn)(?:[^a-z]|$)",
                // customer and tax columns: customer, tax_number, "Tax No", customerName
                r"(?i)(?:^|[^a-z])(?:customer|tax)(?:[^a-z]|$)",
                r"(?:^|[^A-Za-z])(?:[Cc]ustomer|[Tt]ax)[A-Z]",
                r"[a-z](?:Customer|Tax)(?:[A-Z_]|$)",
            ]),
        },
        RolePattern {
            role: ColumnRole::PersonName,
            patterns: compile(&[r"(?i)name|nama"]),
        },
        RolePattern {
            role: ColumnRole::Date,
            patterns: compile(&[
                r"(?i)(?:^|[^a-z])(?:date|tanggal|tgl|dt|dob)(?:[^a-z]|$)",
                r"[a-z](?:Date|Tanggal|Tgl|Dt)(?:[^a-z]|$)",
            ]),
        },
        RolePattern {
            role: ColumnRole::Country,
            patterns: compile(&[r"(?i)origin|citizenship|country|nationality|negara"]),
        },
        RolePattern {
            role: ColumnRole::Phone,
            patterns: compile(&[r"(?i)phone|telp|telephone|mobile"]),
        },
        RolePattern {
            role: ColumnRole::Product,
            patterns: compile(&[r"(?i)product|category|produk|kategori"]),
        },
        RolePattern {
            role: ColumnRole::Vote,
            patterns: compile(&[r"(?i)vote|voting"]),
        },
        RolePattern {
            role: ColumnRole::Marital,
            patterns: compile(&[r"(?i)marital|marriage|pernikahan|nikah|perkawinan|kawin"]),
        },
        RolePattern {
            role: ColumnRole::BloodType,
            patterns: compile(&[r"(?i)blood|darah|goldar"]),
        },
        RolePattern {
            role: ColumnRole::Medical,
            patterns: compile(&[r"(?i)medical|specialty|speciality|spesialis|medis"]),
        },
    ]
});

/// Returns every role whose name pattern matches `column_name`.
pub fn classify_name(column_name: &str) -> BTreeSet<ColumnRole> {
    let name = column_name.trim();
    ROLE_PATTERNS
        .iter()
        .filter(|entry| entry.patterns.iter().any(|re| re.is_match(name)))
        .map(|entry| entry.role)
        .collect()
}
