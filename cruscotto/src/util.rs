use cruscotto_core::CruscottoError;

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// This wraps `futures::future::join_all(tasks)` with
/// [`with_request_deadline`](crate::core::with_request_deadline). Results keep
/// the input order. On timeout the error is `RequestTimeout("request")`,
/// which call sites relabel as needed.
///
/// # Errors
/// Returns `RequestTimeout` when the deadline passes before every task resolves.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, CruscottoError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(deadline, futures::future::join_all(tasks)).await
}

/// Split per-indicator outcomes into successes and tolerated failures.
///
/// Keeps input order on both sides.
pub fn partition_outcomes<K, T>(
    outcomes: Vec<(K, Result<T, CruscottoError>)>,
) -> (Vec<(K, T)>, Vec<(K, CruscottoError)>) {
    let mut ok = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();
    for (key, res) in outcomes {
        match res {
            Ok(v) => ok.push((key, v)),
            Err(e) => failed.push((key, e)),
        }
    }
    (ok, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn join_with_deadline_times_out() {
        let tasks = vec![async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            1
        }];
        let res = join_with_deadline(tasks, Some(Duration::from_millis(1))).await;
        assert!(matches!(res, Err(CruscottoError::RequestTimeout { .. })));
    }

    #[tokio::test]
    async fn join_with_deadline_keeps_order() {
        let tasks = (0..4u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(20 - i * 5)).await;
            i
        });
        let res = join_with_deadline(tasks, Some(Duration::from_secs(5))).await;
        assert_eq!(res, Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn partition_keeps_order() {
        let (ok, failed) = partition_outcomes(vec![
            ("a", Ok(1)),
            ("b", Err(CruscottoError::NoData)),
            ("c", Ok(3)),
        ]);
        assert_eq!(ok, vec![("a", 1), ("c", 3)]);
        assert_eq!(failed, vec![("b", CruscottoError::NoData)]);
    }
}
