#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bookstore_queries::config::Config;
    use mongodb::bson::{doc, Document};
    use bookstore_queries::models::titles;
    use bookstore_queries::seed::{sample_books, seed_books};
    use bookstore_queries::{run, test_context_or_skip, QueryError, QueryRunner, RunnerSettings};

    #[tokio::test]
    async fn test_full_battery_against_sample_catalogue() {
        let ctx = test_context_or_skip!(sample);

        let result: Result<()> = async {
            let settings = RunnerSettings::default();
            let report = QueryRunner::new(&ctx.db, &settings).run_all().await?;

            assert_eq!(report.genre_titles.len(), 4);
            assert_eq!(report.published_after_titles.len(), 4);
            assert_eq!(report.author_titles.len(), 2);

            let update = report.price_update.expect("update ran");
            assert_eq!((update.matched, update.modified), (1, 1));
            assert_eq!(report.deleted, 1);

            assert!(report.in_stock_recent_titles.is_empty());
            assert_eq!(report.projected.len(), 2);

            let remaining = sample_books().len() - 1;
            assert_eq!(report.by_price_ascending.len(), remaining);
            assert_eq!(report.by_price_descending.len(), remaining);
            assert!(report
                .by_price_ascending
                .iter()
                .all(|b| b.title != "Animal Farm"));

            // Animal Farm was ninth; its removal shifts Moby Dick onto page two
            assert_eq!(
                titles(&report.page),
                vec![
                    "The Catcher in the Rye".to_string(),
                    "Pride and Prejudice".to_string(),
                    "The Lord of the Rings".to_string(),
                    "The Alchemist".to_string(),
                    "Moby Dick".to_string(),
                ]
            );

            let top = report.top_author.expect("top author");
            assert_eq!(top.author, "J.R.R. Tolkien");
            assert_eq!(
                report.books_by_decade.iter().map(|r| r.count).sum::<i64>(),
                remaining as i64
            );

            assert_eq!(report.index_names.len(), 2);
            let compound = report.compound_plan.expect("compound plan");
            assert_eq!(compound.total_docs_examined, 1);

            let repriced = ctx.db.find_by_author("George Orwell").await?;
            assert_eq!(repriced.len(), 1);
            assert_eq!(repriced[0].price, 11.99);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_second_run_is_harmless() {
        let ctx = test_context_or_skip!(sample);

        let result: Result<()> = async {
            let settings = RunnerSettings::default();
            QueryRunner::new(&ctx.db, &settings).run_all().await?;
            let again = QueryRunner::new(&ctx.db, &settings).run_all().await?;

            let update = again.price_update.expect("update ran");
            assert_eq!(update.matched, 1);
            assert_eq!(update.modified, 0);
            assert_eq!(again.deleted, 0);
            assert_eq!(again.index_names.len(), 2);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_run_connects_and_releases() {
        let ctx = test_context_or_skip!();

        let result: Result<()> = async {
            assert_eq!(seed_books(&ctx.db, false).await?, sample_books().len());
            // A populated collection is left alone unless reset
            assert_eq!(seed_books(&ctx.db, false).await?, 0);

            let report = run(&ctx.config, &RunnerSettings::default()).await?;
            assert_eq!(report.deleted, 1);

            // The runner's own connection is closed; ours is untouched
            assert_eq!(ctx.db.count_books().await?, sample_books().len() as u64 - 1);

            assert_eq!(seed_books(&ctx.db, true).await?, sample_books().len());
            assert_eq!(ctx.db.count_books().await?, sample_books().len() as u64);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_failure_mid_battery_stops_remaining_operations() {
        let ctx = test_context_or_skip!(sample);

        let result: Result<()> = async {
            // A price stored as text cannot be read back as a book
            ctx.db
                .books()
                .clone_with_type::<Document>()
                .insert_one(doc! {
                    "title": "Price Unknown",
                    "author": "Nobody",
                    "genre": "Fiction",
                    "published_year": 2001,
                    "price": "twelve dollars",
                    "in_stock": true,
                })
                .await?;
            let before = ctx.db.count_books().await?;

            let err = match run(&ctx.config, &RunnerSettings::default()).await {
                Ok(_) => panic!("genre read should fail on the malformed book"),
                Err(e) => e,
            };
            assert!(matches!(
                err,
                QueryError::OperationFailed { .. } | QueryError::UnexpectedResult { .. }
            ));
            assert_eq!(err.operation(), "find books by genre");

            // Nothing after the failing read ran
            assert_eq!(ctx.db.count_books().await?, before);
            assert_eq!(ctx.db.find_by_author("George Orwell").await?.len(), 2);
            assert_eq!(ctx.db.list_index_names().await?, vec!["_id_".to_string()]);
            Ok(())
        }
        .await;

        if let Err(e) = ctx.cleanup_and_close().await {
            eprintln!("Warning: Test cleanup failed: {}", e);
        }

        result.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_one_operation_failure() {
        let config = Config::from_lookup(|key| match key {
            "MONGODB_URI" => Some("mongodb://127.0.0.1:9".to_string()),
            "SERVER_SELECTION_TIMEOUT_SECONDS" => Some("1".to_string()),
            _ => None,
        });

        let err = run(&config, &RunnerSettings::default())
            .await
            .expect_err("nothing listens on port 9");

        match err {
            QueryError::OperationFailed { operation, .. } => assert_eq!(operation, "ping"),
            other => panic!("expected OperationFailed, got {:?}", other),
        }
    }
}
