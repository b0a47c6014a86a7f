#![allow(dead_code)]
use quarry::Entity;
use rust_decimal::Decimal;
use time::Date;

#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[quarry(name = "people")]
pub struct Person {
    #[quarry(primary_key, generated, db_type = Int32)]
    pub id: i32,
    #[quarry(name = "full_name", db_type = VarChar)]
    pub name: String,
    pub age: u8,
    #[quarry(db_type = Date)]
    pub born: Option<Date>,
    #[quarry(db_type = NewDecimal)]
    pub balance: Decimal,
    pub active: bool,
    #[quarry(skip)]
    pub visits: u32,
}

/// Record from the round trip scenario, `Date` has no empty value.
#[derive(Debug, Clone, PartialEq, Entity)]
pub struct T {
    #[quarry(primary_key, generated)]
    pub id: i32,
    pub name: String,
    pub created: Date,
}

/// No primary key, UPDATE touches every row and DELETE is refused.
#[derive(Default, Debug, Clone, PartialEq, Entity)]
#[quarry(name = "log_lines")]
pub struct LogLine {
    pub message: String,
    pub level: Option<String>,
}
