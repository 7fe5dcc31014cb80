//! End-to-end pipeline tests against real temp files

#[cfg(test)]
mod tests {
    use crate::pipeline::Orchestrator;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    fn orchestrator_for_test(capacity: usize) -> Orchestrator {
        Orchestrator::new(capacity)
            .unwrap()
            .with_grace_period(Duration::from_millis(300))
    }

    #[test]
    fn test_single_producer_single_consumer_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "hello\nworld\ntest\n").unwrap();

        let orchestrator = orchestrator_for_test(10);
        orchestrator.add_producer(&input, None).unwrap();
        orchestrator.add_consumer(&output, None).unwrap();
        orchestrator.run().unwrap();

        let stats = orchestrator.stats();
        assert_eq!(stats.total_produced, 3);
        assert_eq!(stats.total_consumed, 3);
        assert_eq!(stats.producers, 1);
        assert_eq!(stats.consumers, 1);

        let lines = read_lines(&output);
        assert_eq!(lines.len(), 3);
        for expected in ["HELLO", "WORLD", "TEST"] {
            assert_eq!(
                lines.iter().filter(|line| *line == expected).count(),
                1,
                "expected exactly one {}",
                expected
            );
        }
    }

    #[test]
    fn test_missing_source_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");

        let orchestrator = orchestrator_for_test(10);
        orchestrator
            .add_producer(dir.path().join("no-such-input.txt"), None)
            .unwrap();
        orchestrator.add_consumer(&output, None).unwrap();

        // The failed producer logs and completes; the run still terminates
        orchestrator.run().unwrap();

        let stats = orchestrator.stats();
        assert_eq!(stats.total_produced, 0);
        assert_eq!(stats.total_consumed, 0);
    }

    #[test]
    fn test_failed_producer_does_not_stop_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "alpha\nbeta\n").unwrap();

        let orchestrator = orchestrator_for_test(10);
        orchestrator
            .add_producer(dir.path().join("missing.txt"), None)
            .unwrap();
        orchestrator.add_producer(&input, None).unwrap();
        orchestrator.add_consumer(&output, None).unwrap();
        orchestrator.run().unwrap();

        let stats = orchestrator.stats();
        assert_eq!(stats.total_produced, 2);
        assert_eq!(stats.total_consumed, 2);

        let mut lines = read_lines(&output);
        lines.sort();
        assert_eq!(lines, vec!["ALPHA", "BETA"]);
    }

    #[test]
    fn test_rerun_with_fresh_orchestrator_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "one\ntwo\nthree\n").unwrap();

        for _ in 0..2 {
            let orchestrator = orchestrator_for_test(10);
            orchestrator.add_producer(&input, None).unwrap();
            orchestrator.add_consumer(&output, None).unwrap();
            orchestrator.run().unwrap();
        }

        // Sink truncation at consumer start means no appended duplicates
        let lines = read_lines(&output);
        assert_eq!(lines, vec!["ONE", "TWO", "THREE"]);
    }

    #[test]
    fn test_custom_transform_replaces_default_policy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "abc\n").unwrap();

        let orchestrator = orchestrator_for_test(10);
        orchestrator.add_producer(&input, None).unwrap();
        orchestrator
            .add_consumer_with_transform(&output, None, |line| {
                line.chars().rev().collect()
            })
            .unwrap();
        orchestrator.run().unwrap();

        assert_eq!(read_lines(&output), vec!["cba"]);
    }

    #[test]
    fn test_blank_lines_are_dropped_before_production() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "keep\n\n   \nalso\n").unwrap();

        let orchestrator = orchestrator_for_test(10);
        orchestrator.add_producer(&input, None).unwrap();
        orchestrator.add_consumer(&output, None).unwrap();
        orchestrator.run().unwrap();

        assert_eq!(orchestrator.stats().total_produced, 2);
        let mut lines = read_lines(&output);
        lines.sort();
        assert_eq!(lines, vec!["ALSO", "KEEP"]);
    }

    #[test]
    fn test_custom_collaborators_bypass_the_filesystem() {
        use crate::records::{LineSink, LineSource, RecordResult};
        use std::path::Path;
        use std::sync::{Arc, Mutex};

        struct MemorySource(Vec<String>);

        impl LineSource for MemorySource {
            fn read_lines(&self, _path: &Path) -> RecordResult<Vec<String>> {
                Ok(self.0.clone())
            }
        }

        #[derive(Default)]
        struct MemorySink(Mutex<Vec<String>>);

        impl LineSink for MemorySink {
            fn append_line(&self, _path: &Path, line: &str) -> RecordResult<()> {
                self.0.lock().unwrap().push(line.to_string());
                Ok(())
            }

            fn truncate(&self, _path: &Path) -> RecordResult<()> {
                self.0.lock().unwrap().clear();
                Ok(())
            }
        }

        let sink = Arc::new(MemorySink::default());
        let source = Arc::new(MemorySource(vec!["alpha".into(), "beta".into()]));
        let orchestrator = Orchestrator::with_collaborators(
            10,
            source,
            Arc::clone(&sink) as Arc<dyn LineSink>,
        )
        .unwrap()
        .with_grace_period(Duration::from_millis(300));

        orchestrator.add_producer("unused", None).unwrap();
        orchestrator.add_consumer("unused", None).unwrap();
        orchestrator.run().unwrap();

        let collected = sink.0.lock().unwrap().clone();
        assert_eq!(collected, vec!["ALPHA", "BETA"]);
    }

    #[test]
    fn test_stats_snapshot_serialises_with_expected_keys() {
        let orchestrator = orchestrator_for_test(10);
        let value = serde_json::to_value(orchestrator.stats()).unwrap();

        for key in [
            "total_produced",
            "total_consumed",
            "queue_size",
            "producers",
            "consumers",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["producers"], 0);
        assert_eq!(value["queue_size"], 0);
    }
}
