mod resource {
    pub mod person;
    pub mod recorder;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        person::{LogLine, Person, T},
        recorder::{RecordingConnection, init_logs},
    };
    use quarry::{
        ColumnDef, DataError, Entity, GenericSqlWriter, Row, SqlWriter, TableRef, materialize_field,
    };
    use rust_decimal::Decimal;
    use time::macros::date;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    fn alice() -> T {
        T {
            id: 7,
            name: "Alice".into(),
            created: date!(2024 - 01 - 02),
        }
    }

    #[test]
    fn insert_round_trip_record() {
        let mut out = String::new();
        WRITER.write_insert(&mut out, [&alice()]).unwrap();
        assert_eq!(out, "INSERT INTO T VALUES (NULL,'Alice','2024-01-02 00:00')");
    }

    #[test]
    fn update_round_trip_record() {
        let mut bob = alice();
        bob.name = "Bob".into();
        let mut out = String::new();
        WRITER.write_update(&mut out, &bob).unwrap();
        assert_eq!(out, "UPDATE T SET name='Bob',created='2024-01-02' WHERE id=7");
    }

    #[test]
    fn insert_batch() {
        let people = [
            Person {
                id: 1,
                name: "Ada".into(),
                age: 36,
                born: None,
                balance: Decimal::new(-25, 1),
                active: true,
                visits: 9,
            },
            Person {
                id: 2,
                name: "O'Hara".into(),
                age: 41,
                born: Some(date!(1980 - 05 - 06)),
                balance: Decimal::ZERO,
                active: false,
                visits: 0,
            },
        ];
        let mut out = String::new();
        WRITER.write_insert(&mut out, &people).unwrap();
        assert_eq!(
            out,
            "INSERT INTO people VALUES (NULL,'Ada',36,NULL,-2.5,true),(NULL,'O''Hara',41,'1980-05-06 00:00',0,false)"
        );
    }

    #[test]
    fn insert_empty_batch() {
        let mut out = String::new();
        let error = WRITER.write_insert::<T>(&mut out, []).unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::EmptyBatch { table: "T" })
        );
    }

    #[test]
    fn update_person() {
        let person = Person {
            id: 3,
            name: "Lin".into(),
            age: 20,
            born: Some(date!(2004 - 02 - 29)),
            balance: Decimal::new(10, 0),
            active: true,
            visits: 1,
        };
        let mut out = String::new();
        WRITER.write_update(&mut out, &person).unwrap();
        assert_eq!(
            out,
            "UPDATE people SET full_name='Lin',age=20,born='2004-02-29',balance=10,active=1 WHERE id=3"
        );
    }

    #[test]
    fn update_without_primary_key() {
        init_logs();
        let line = LogLine {
            message: "started".into(),
            level: None,
        };
        let mut out = String::new();
        WRITER.write_update(&mut out, &line).unwrap();
        assert_eq!(out, "UPDATE log_lines SET message='started',level=NULL");
    }

    #[test]
    fn delete_by_primary_key() {
        let mut out = String::new();
        WRITER.write_delete(&mut out, &alice()).unwrap();
        assert_eq!(out, "DELETE FROM T WHERE id=7");
    }

    #[test]
    fn delete_without_primary_key() {
        let mut out = String::new();
        let error = WRITER
            .write_delete(
                &mut out,
                &LogLine {
                    message: "x".into(),
                    level: None,
                },
            )
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::MissingPrimaryKey { table: "log_lines" })
        );
        assert!(out.is_empty());
    }

    /// Both `code` and `label` claim to be the key, the first declared one wins.
    struct Tag {
        code: String,
        label: String,
        weight: i32,
    }

    static TAG: TableRef = TableRef {
        name: "tags",
        columns: &[
            ColumnDef {
                field: "code",
                name: "code",
                db_type: None,
                primary_key: true,
                generated: false,
                nullable: false,
                mapped: true,
            },
            ColumnDef {
                field: "label",
                name: "label",
                db_type: None,
                primary_key: true,
                generated: false,
                nullable: false,
                mapped: true,
            },
            ColumnDef {
                field: "weight",
                name: "weight",
                db_type: None,
                primary_key: false,
                generated: false,
                nullable: false,
                mapped: true,
            },
        ],
    };

    impl Entity for Tag {
        fn table() -> &'static TableRef {
            &TAG
        }
        fn row(&self) -> Row {
            vec![
                self.code.clone().into(),
                self.label.clone().into(),
                self.weight.into(),
            ]
            .into_boxed_slice()
        }
        fn from_values(values: Row) -> quarry::Result<Self> {
            let mut values = values.into_vec().into_iter();
            Ok(Tag {
                code: materialize_field("code", values.next().unwrap_or_default())?,
                label: materialize_field("label", values.next().unwrap_or_default())?,
                weight: materialize_field("weight", values.next().unwrap_or_default())?,
            })
        }
    }

    #[test]
    fn update_uses_first_primary_key() {
        let tag = Tag {
            code: "rs".into(),
            label: "Rust".into(),
            weight: 3,
        };
        let mut out = String::new();
        WRITER.write_update(&mut out, &tag).unwrap();
        assert_eq!(
            out,
            "UPDATE tags SET code='rs',label='Rust',weight=3 WHERE code='rs'"
        );
        assert_eq!(out.matches(" WHERE ").count(), 1);
    }

    #[test]
    fn update_nothing_to_set() {
        struct Counter {
            id: i64,
        }
        static COUNTER: TableRef = TableRef {
            name: "counters",
            columns: &[ColumnDef {
                field: "id",
                name: "id",
                db_type: None,
                primary_key: true,
                generated: true,
                nullable: false,
                mapped: true,
            }],
        };
        impl Entity for Counter {
            fn table() -> &'static TableRef {
                &COUNTER
            }
            fn row(&self) -> Row {
                vec![self.id.into()].into_boxed_slice()
            }
            fn from_values(values: Row) -> quarry::Result<Self> {
                let value = values.into_vec().into_iter().next().unwrap_or_default();
                Ok(Counter {
                    id: materialize_field("id", value)?,
                })
            }
        }
        let mut out = String::new();
        let error = WRITER.write_update(&mut out, &Counter { id: 1 }).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedOperation(..))
        ));
    }

    #[tokio::test]
    async fn entity_statements_run_on_executor() {
        let mut connection = RecordingConnection::new();
        connection.push_affected(1);
        let affected = T::insert_one(&mut connection, &alice()).await.unwrap();
        assert_eq!(affected.rows_affected, 1);

        let batch = [
            alice(),
            T {
                id: 0,
                name: "Zed".into(),
                created: date!(2023 - 12 - 31),
            },
        ];
        T::insert_many_where(&mut connection, &batch, |v| v.name.starts_with('Z'))
            .await
            .unwrap();
        let error = T::insert_many_where(&mut connection, &batch, |_| false)
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::EmptyBatch { table: "T" })
        );

        T::update_one(&mut connection, &alice()).await.unwrap();
        T::delete_one(&mut connection, &alice()).await.unwrap();
        assert!(
            LogLine::delete_one(&mut connection, &LogLine::default())
                .await
                .is_err()
        );

        assert_eq!(
            connection.statements,
            [
                "INSERT INTO T VALUES (NULL,'Alice','2024-01-02 00:00')",
                "INSERT INTO T VALUES (NULL,'Zed','2023-12-31 00:00')",
                "UPDATE T SET name='Alice',created='2024-01-02' WHERE id=7",
                "DELETE FROM T WHERE id=7",
            ]
        );
    }
}
