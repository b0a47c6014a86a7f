mod resource {
    pub mod person;
    pub mod recorder;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        person::T,
        recorder::{CONNECTS, DISCONNECTS, RecordingConnection, count, init_logs},
    };
    use quarry::{
        ConnectionConfig, DataContext, DataError, Entity, Executor, Value, stream::TryStreamExt,
    };

    #[tokio::test]
    async fn open_and_close_are_idempotent() {
        init_logs();
        let url = "recording://open-close/db";
        let mut context = DataContext::<RecordingConnection>::with_url(url);
        assert!(!context.is_open());
        context.open().await.unwrap();
        context.open().await.unwrap();
        assert!(context.is_open());
        assert_eq!(count(&CONNECTS, url), 1);

        context.close().await.unwrap();
        context.close().await.unwrap();
        assert!(!context.is_open());
        assert_eq!(count(&DISCONNECTS, url), 1);

        context.open().await.unwrap();
        assert_eq!(count(&CONNECTS, url), 2);
    }

    #[tokio::test]
    async fn closed_context_refuses_statements() {
        init_logs();
        let mut context = DataContext::<RecordingConnection>::with_url("recording://closed/db");
        let error = context.execute("DELETE FROM T".into()).await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::ConnectionClosed)
        );
        let error = T::query()
            .fetch(&mut context)
            .try_collect::<Vec<_>>()
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::ConnectionClosed)
        );
    }

    #[tokio::test]
    async fn open_without_url() {
        let mut context = DataContext::new(RecordingConnection::new());
        assert!(context.is_open());
        context.close().await.unwrap();
        let error = context.open().await.unwrap_err();
        assert_eq!(
            error.downcast_ref::<DataError>(),
            Some(&DataError::NullArgument("url"))
        );
    }

    #[tokio::test]
    async fn connect_with_config() {
        let config = ConnectionConfig::new("db.example:4000", "app", "pw", "inventory").unwrap();
        let url = "recording://app:pw@db.example:4000/inventory";
        let mut context = DataContext::<RecordingConnection>::connect(&config)
            .await
            .unwrap();
        assert!(context.is_open());
        assert_eq!(count(&CONNECTS, url), 1);
        assert_eq!(context.connection().map(|c| c.url.as_str()), Some(url));
    }

    #[tokio::test]
    async fn context_runs_queries() {
        let mut context = DataContext::new(RecordingConnection::new());
        if let Some(connection) = context.connection() {
            connection.push_rows(
                &["id", "name", "created"],
                vec![vec![
                    Value::Int32(Some(1)),
                    "Ann".into(),
                    "2024-05-06".into(),
                ]],
            );
        }
        let records: Vec<T> = context
            .table::<T>()
            .fetch(&mut context)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ann");
        T::delete_one(&mut context, &records[0]).await.unwrap();
        let statements = context
            .connection()
            .map(|c| c.statements.clone())
            .unwrap_or_default();
        assert_eq!(statements, ["SELECT * FROM T", "DELETE FROM T WHERE id=1"]);
    }
}
