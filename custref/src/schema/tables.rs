//! Record layouts of the export.
//!
//! Column order below must match the field order of the `CUST` and `REF`
//! records exactly.

use once_cell::sync::Lazy;

use super::field::FieldType;
use super::table::{Column, Table};

const TEXT: FieldType = FieldType::text();
const INTEGER: FieldType = FieldType::integer();
const YESNO: FieldType = FieldType::yesno();

/// Customers, read from `CUST` records.
pub static CUSTOMERS: Lazy<Table> = Lazy::new(|| {
    Table::new(
        "customers",
        vec![
            Column::new("record_type", TEXT.no_sql()),
            Column::new("customer_code", TEXT),
            Column::new("name", TEXT),
            Column::new("name_extra", TEXT),
            Column::new("address_number", TEXT),
            Column::new("address_line_1", TEXT),
            Column::new("address_line_2", TEXT),
            Column::new("address_line_3", TEXT),
            Column::new("address_line_4", TEXT),
            Column::new("address_line_5", TEXT),
            Column::new("contact_name", TEXT),
            Column::new("contact_extra", TEXT),
            Column::new("language_code", TEXT),
            Column::new("language", TEXT),
            Column::new("headquarter", YESNO),
            Column::new("headquarter_code", TEXT),
            Column::new("telephone", TEXT),
            Column::new("mobile_phone", TEXT),
            Column::new("insert_date", TEXT.no_csv()),
            Column::new("insert_time", TEXT.no_csv()),
        ],
    )
});

/// Customer references, read from `REF` records.
pub static REFERENCES: Lazy<Table> = Lazy::new(|| {
    Table::new(
        "customer_references",
        vec![
            Column::new("record_type", TEXT.no_sql()),
            Column::new("reference_identifier", TEXT),
            Column::new("length", INTEGER),
            Column::new("mandatory", YESNO),
            Column::new("numeric_only", YESNO),
            Column::new("folf_start_position", INTEGER),
            Column::new("folf_length", INTEGER),
            Column::new("print_on_invoice", YESNO),
            Column::new("check_type", TEXT),
            Column::new("send_to_crs", YESNO),
            Column::new("validation_mask", TEXT),
            Column::new("internal_name", TEXT),
            Column::new("customer_reference_desc", TEXT),
            Column::new("dbi_connector", TEXT),
            Column::new("dbi_connector_desc", TEXT),
            Column::new("alphabetic_only", YESNO),
            Column::new("no_special_characters", YESNO),
            Column::new("only_capital_letters", YESNO),
            Column::new("minimum_length", INTEGER),
            Column::new("reference_type", TEXT),
            Column::new("insert_date", TEXT.no_csv()),
            Column::new("insert_time", TEXT.no_csv()),
        ],
    )
    .with_foreign_keys(vec![Column::new("customer_code", TEXT)])
});
