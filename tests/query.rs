mod resource {
    pub mod person;
    pub mod recorder;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        person::{Person, T},
        recorder::{RecordingConnection, init_logs},
    };
    use quarry::{
        Connection, DataError, Driver, Entity, Executor, Expr, GenericSqlWriter, QueryNode,
        QueryResult, Result, SqlWriter, Value, expr,
        stream::{Stream, TryStreamExt},
    };
    use std::{borrow::Cow, marker::PhantomData, rc::Rc};
    use time::macros::date;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    fn assert_send<S: Send>(_: &S) {}

    /// Writer that must stay on the thread that created it.
    #[derive(Default)]
    struct LocalWriter(PhantomData<Rc<()>>);

    impl SqlWriter for LocalWriter {
        fn as_dyn(&self) -> &dyn SqlWriter {
            self
        }
    }

    #[derive(Default, Clone, Copy)]
    struct LocalDriver;

    impl Driver for LocalDriver {
        type Connection = LocalConnection;
        type SqlWriter = LocalWriter;

        const NAME: &'static str = "local";
        fn sql_writer(&self) -> LocalWriter {
            LocalWriter::default()
        }
    }

    #[derive(Default)]
    struct LocalConnection(RecordingConnection);

    impl Executor for LocalConnection {
        type Driver = LocalDriver;

        fn driver(&self) -> &Self::Driver {
            &LocalDriver {}
        }

        fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
            self.0.run(query)
        }
    }

    impl Connection for LocalConnection {
        async fn connect(url: Cow<'static, str>) -> Result<Self> {
            RecordingConnection::connect(url).await.map(Self)
        }

        async fn disconnect(self) -> Result<()> {
            self.0.disconnect().await
        }
    }

    #[test]
    fn query_compiles_chain() {
        let query = Person::query()
            .filter(Person::age.greater_equal(18))
            .filter(Person::active.equal(true))
            .order_by_descending(Person::age)
            .order_by(Person::name)
            .limit(5);
        assert_eq!(
            query.to_sql(&WRITER).unwrap(),
            "SELECT * FROM people WHERE (age >= 18) AND (active = true) ORDER BY age DESC, full_name LIMIT 5"
        );
    }

    #[test]
    fn query_is_immutable() {
        let all = Person::query();
        let adults = all.filter(Person::age.greater(17));
        let first = adults.limit(1);
        assert_eq!(all.to_sql(&WRITER).unwrap(), "SELECT * FROM people");
        assert_eq!(
            adults.to_sql(&WRITER).unwrap(),
            "SELECT * FROM people WHERE (age > 17)"
        );
        assert_eq!(
            first.to_sql(&WRITER).unwrap(),
            "SELECT * FROM people WHERE (age > 17) LIMIT 1"
        );
        assert!(matches!(first.node(), QueryNode::Limit(_, 1)));
        assert_eq!(first.node().source().name, "people");
    }

    #[test]
    fn query_count() {
        assert_eq!(
            T::query().count().to_sql(&WRITER).unwrap(),
            "SELECT COUNT(*) FROM T"
        );
        assert_eq!(
            T::query()
                .filter(T::name.not_equal("x"))
                .count()
                .to_sql(&WRITER)
                .unwrap(),
            "SELECT COUNT(*) FROM T WHERE (name <> 'x')"
        );
    }

    #[test]
    fn query_count_keeps_order_and_limit() {
        assert_eq!(
            T::query()
                .order_by(T::id)
                .limit(1)
                .count()
                .to_sql(&WRITER)
                .unwrap(),
            "SELECT COUNT(*) FROM T ORDER BY id LIMIT 1"
        );
    }

    #[test]
    fn query_with_expr_macro() {
        let min = 21;
        let query = Person::query().filter(expr!(
            Person::age >= min && !(Person::name == "Bob") || Person::born == None
        ));
        assert_eq!(
            query.to_sql(&WRITER).unwrap(),
            "SELECT * FROM people WHERE (((age >= 21) AND  NOT (full_name = 'Bob')) OR (born IS NULL))"
        );
        assert_eq!(
            expr!(T::id != 3 && T::created < date!(2024 - 01 - 01)),
            Expr::field("id")
                .not_equal(3)
                .and(Expr::field("created").less(date!(2024 - 01 - 01)))
        );
        assert_eq!(expr!(None), Expr::Literal(Value::Null));
    }

    #[test]
    fn query_out_of_order() {
        let error = T::query()
            .limit(3)
            .filter(T::id.equal(1))
            .to_sql(&WRITER)
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedOperation(..))
        ));
    }

    #[tokio::test]
    async fn query_fetch_runs_every_time() {
        init_logs();
        let mut connection = RecordingConnection::new();
        let rows = || {
            vec![
                vec![Value::Int32(Some(1)), "Ann".into(), date!(2024 - 01 - 02).into()],
                vec![Value::Int32(Some(2)), "Ben".into(), date!(2024 - 01 - 03).into()],
            ]
        };
        connection.push_rows(&["id", "name", "created"], rows());
        connection.push_rows(&["id", "name", "created"], rows()[..1].to_vec());

        let query = T::query().filter(T::id.greater(0)).order_by(T::id);
        let first: Vec<T> = query.fetch(&mut connection).try_collect().await.unwrap();
        let second: Vec<T> = query.fetch(&mut connection).try_collect().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].name, "Ben");
        assert_eq!(second.len(), 1);
        assert_eq!(
            connection.statements,
            [
                "SELECT * FROM T WHERE (id > 0) ORDER BY id",
                "SELECT * FROM T WHERE (id > 0) ORDER BY id",
            ]
        );
    }

    #[tokio::test]
    async fn query_fetch_count() {
        let mut connection = RecordingConnection::new();
        connection.push_rows(&["COUNT(*)"], vec![vec![Value::Int64(Some(42))]]);
        connection.push_rows(&["COUNT(*)"], vec![]);
        let count = T::query().count();
        assert_eq!(count.fetch(&mut connection).await.unwrap(), 42);
        assert_eq!(count.fetch(&mut connection).await.unwrap(), 0);
        assert_eq!(connection.statements.len(), 2);
    }

    #[tokio::test]
    async fn query_fetch_nothing_until_polled() {
        let mut connection = RecordingConnection::new();
        let query = T::query();
        {
            let _stream = query.fetch(&mut connection);
        }
        assert!(connection.statements.is_empty());
    }

    #[tokio::test]
    async fn query_fetch_is_send_with_thread_bound_writer() {
        let mut connection = LocalConnection::default();
        connection.0.push_rows(
            &["id", "name", "created"],
            vec![vec![
                Value::Int32(Some(5)),
                "Eve".into(),
                date!(2024 - 05 - 06).into(),
            ]],
        );
        connection
            .0
            .push_rows(&["COUNT(*)"], vec![vec![Value::Int64(Some(1))]]);

        let query = T::query().limit(1);
        let stream = query.fetch(&mut connection);
        assert_send(&stream);
        let records: Vec<T> = stream.try_collect().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Eve");

        let count = T::query().count();
        let future = count.fetch(&mut connection);
        assert_send(&future);
        assert_eq!(future.await.unwrap(), 1);
        assert_eq!(
            connection.0.statements,
            ["SELECT * FROM T LIMIT 1", "SELECT COUNT(*) FROM T"]
        );
    }
}
