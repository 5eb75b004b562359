use muxcall::{
    CallResultStatus, EncodedCall, Multicall, MulticallError, RawResponse, RawResult,
    ReadMethod, RemoteCallExecutor, call_selector,
};
use rand::Rng;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const TOKEN: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
const SYMBOL: u64 = call_selector!("symbol");
const DECIMALS: u64 = call_selector!("decimals");
const BALANCE_OF: u64 = call_selector!("balanceOf");

/// Test executor that answers every aggregated request with `respond` and
/// records what it was given.
struct MockExecutor<F> {
    respond: F,
    aggregate_count: AtomicUsize,
    submitted: Mutex<Vec<EncodedCall>>,
}

impl<F> MockExecutor<F>
where
    F: Fn(&[EncodedCall]) -> Result<RawResponse, io::Error> + Send + Sync,
{
    fn new(respond: F) -> Self {
        MockExecutor {
            respond,
            aggregate_count: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn aggregate_count(&self) -> usize {
        self.aggregate_count.load(Ordering::SeqCst)
    }

    fn submitted(&self) -> Vec<EncodedCall> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl<F> RemoteCallExecutor for MockExecutor<F>
where
    F: Fn(&[EncodedCall]) -> Result<RawResponse, io::Error> + Send + Sync,
{
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error> {
        self.aggregate_count.fetch_add(1, Ordering::SeqCst);
        let response = (self.respond)(&calls);
        *self.submitted.lock().unwrap() = calls;
        response
    }
}

/// Answers each call with its own argument bytes.
fn echo_executor() -> MockExecutor<impl Fn(&[EncodedCall]) -> Result<RawResponse, io::Error> + Send + Sync> {
    MockExecutor::new(|calls: &[EncodedCall]| {
        Ok(RawResponse {
            block_number: 7,
            results: calls
                .iter()
                .map(|call| RawResult::success(call.arguments.clone()))
                .collect(),
        })
    })
}

/// Answers with a fixed list of results, regardless of what was submitted.
fn canned_executor(
    results: Vec<RawResult>,
) -> MockExecutor<impl Fn(&[EncodedCall]) -> Result<RawResponse, io::Error> + Send + Sync> {
    MockExecutor::new(move |_: &[EncodedCall]| {
        Ok(RawResponse {
            block_number: 19_000_000,
            results: results.clone(),
        })
    })
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

fn decode_string(bytes: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(bytes.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn decode_u8(bytes: &[u8]) -> Result<u8, io::Error> {
    match bytes {
        [value] => Ok(*value),
        _ => Err(invalid("expected exactly one byte")),
    }
}

fn decode_u64(bytes: &[u8]) -> Result<u64, io::Error> {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_le_bytes)
        .map_err(|_| invalid("expected 8 bytes"))
}

#[tokio::test]
async fn results_follow_enqueue_order_across_interleaved_types() {
    enum Expected {
        Text(muxcall::CallHandle<String>, String),
        Small(muxcall::CallHandle<u8>, u8),
        Large(muxcall::CallHandle<u64>, u64),
    }

    let mut rng = rand::rng();
    let mut batch = Multicall::new();
    let mut expected = Vec::new();

    for i in 0..250 {
        let entry = match rng.random_range(0..3) {
            0 => {
                let text = format!("call-{i}");
                let handle = batch.add_raw(TOKEN, SYMBOL, text.clone().into_bytes(), decode_string);
                Expected::Text(handle, text)
            }
            1 => {
                let value: u8 = rng.random();
                let handle = batch.add_raw(TOKEN, DECIMALS, vec![value], decode_u8);
                Expected::Small(handle, value)
            }
            _ => {
                let value: u64 = rng.random();
                let handle =
                    batch.add_raw(TOKEN, BALANCE_OF, value.to_le_bytes().to_vec(), decode_u64);
                Expected::Large(handle, value)
            }
        };
        expected.push(entry);
    }

    let executor = echo_executor();
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(executor.aggregate_count(), 1);
    assert_eq!(results.len(), 250);
    assert!(results.is_complete());

    for (position, entry) in expected.iter().enumerate() {
        match entry {
            Expected::Text(handle, value) => {
                assert_eq!(handle.index(), position);
                assert_eq!(results.get(handle).unwrap(), value);
            }
            Expected::Small(handle, value) => {
                assert_eq!(handle.index(), position);
                assert_eq!(results.get(handle).unwrap(), value);
            }
            Expected::Large(handle, value) => {
                assert_eq!(handle.index(), position);
                assert_eq!(results.get(handle).unwrap(), value);
            }
        }
    }
}

#[tokio::test]
async fn calls_are_submitted_once_in_sequence_order() {
    let mut batch = Multicall::new();
    batch.add_raw(TOKEN, SYMBOL, vec![], decode_string);
    batch.add_raw("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", DECIMALS, vec![], decode_u8);
    batch.add_raw_optional(TOKEN, BALANCE_OF, vec![1, 2, 3], decode_u64);

    let indices: Vec<usize> = batch
        .descriptors()
        .iter()
        .map(|descriptor| descriptor.sequence_index())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(batch.len(), 3);

    let executor = MockExecutor::new(|calls: &[EncodedCall]| {
        Ok(RawResponse {
            block_number: 1,
            results: calls
                .iter()
                .map(|_| RawResult::failure(CallResultStatus::Reverted, vec![]))
                .collect(),
        })
    });

    // The first call does not allow failure, so the whole batch is rejected.
    let err = batch.execute(&executor).await.unwrap_err();
    assert!(matches!(err, MulticallError::CallFailed { index: 0, .. }));

    let submitted = executor.submitted();
    assert_eq!(executor.aggregate_count(), 1);
    assert_eq!(submitted.len(), 3);
    assert_eq!(submitted[0].selector, SYMBOL);
    assert_eq!(
        submitted[1].target.as_str(),
        "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
    );
    assert_eq!(submitted[2].arguments, vec![1, 2, 3]);
    assert!(!submitted[0].allow_failure);
    assert!(submitted[2].allow_failure);
}

#[tokio::test]
async fn empty_batch_is_rejected_without_contacting_executor() {
    let executor = echo_executor();

    let err = Multicall::new().execute(&executor).await.unwrap_err();

    assert!(matches!(err, MulticallError::EmptyBatch));
    assert!(err.is_transport_level());
    assert_eq!(executor.aggregate_count(), 0);
}

#[tokio::test]
async fn shorter_response_is_a_length_mismatch() {
    let mut batch = Multicall::new();
    for _ in 0..3 {
        batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8);
    }

    let executor = canned_executor(vec![RawResult::success(vec![6]), RawResult::success(vec![6])]);
    let err = batch.execute(&executor).await.unwrap_err();

    match err {
        MulticallError::ResponseLengthMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn longer_response_is_a_length_mismatch() {
    let mut batch = Multicall::new();
    batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8);

    let executor = canned_executor(vec![RawResult::success(vec![6]); 2]);
    let err = batch.execute(&executor).await.unwrap_err();

    assert!(matches!(
        err,
        MulticallError::ResponseLengthMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert!(err.is_transport_level());
}

#[tokio::test]
async fn transport_errors_propagate_unchanged() {
    let mut batch = Multicall::new();
    batch.add_raw(TOKEN, SYMBOL, vec![], decode_string);

    let executor = MockExecutor::new(|_: &[EncodedCall]| {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "node went away"))
    });
    let err = batch.execute(&executor).await.unwrap_err();

    assert!(err.is_transport_level());
    match err {
        MulticallError::Transport(cause) => {
            assert_eq!(cause.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(cause.to_string(), "node went away");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(executor.aggregate_count(), 1);
}

#[tokio::test]
async fn decode_failure_is_isolated_to_its_position() {
    let mut batch = Multicall::new();
    let symbol = batch.add_raw(TOKEN, SYMBOL, vec![], decode_string);
    let decimals = batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8);
    let supply = batch.add_raw(TOKEN, BALANCE_OF, vec![], decode_u64);

    let executor = canned_executor(vec![
        RawResult::success(b"DAI".to_vec()),
        RawResult::success(vec![1, 2, 3]),
        RawResult::success(42u64.to_le_bytes().to_vec()),
    ]);
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(results.get(&symbol).unwrap(), "DAI");
    assert_eq!(*results.get(&supply).unwrap(), 42);

    let err = results.get(&decimals).unwrap_err();
    assert!(!err.is_transport_level());
    assert_eq!(err.index(), Some(1));

    assert!(!results.is_complete());
    let failed: Vec<usize> = results.decode_errors().map(|e| e.index).collect();
    assert_eq!(failed, vec![1]);

    match results.into_complete() {
        Err(MulticallError::Decode(decode_err)) => {
            assert_eq!(decode_err.index, 1);
            assert_eq!(decode_err.cause.kind(), io::ErrorKind::InvalidData);
        }
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn repeated_enqueue_gets_independent_positions() {
    let mut batch = Multicall::new();
    let handles: Vec<_> = (0..3)
        .map(|_| batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8))
        .collect();

    assert_eq!(
        handles.iter().map(|h| h.index()).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    let executor = canned_executor(vec![
        RawResult::success(vec![18]),
        RawResult::success(vec![6]),
        RawResult::success(vec![0]),
    ]);
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(executor.submitted().len(), 3);
    assert_eq!(*results.get(&handles[0]).unwrap(), 18);
    assert_eq!(*results.get(&handles[1]).unwrap(), 6);
    assert_eq!(*results.get(&handles[2]).unwrap(), 0);
}

#[tokio::test]
async fn token_balances_are_scaled_by_the_decimals_result() {
    let holders = [
        "0x3DdfA8eC3052539b6C9549F12cEA2C295cfF5296",
        "0x5777d92f208679DB4b9778590Fa3CAB3aC9e2168",
        "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
    ];

    let mut batch = Multicall::new();
    let symbol = batch.add_raw(TOKEN, SYMBOL, vec![], decode_string);
    let decimals = batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8);
    let balances: Vec<_> = holders
        .iter()
        .map(|holder| batch.add_raw(TOKEN, BALANCE_OF, holder.as_bytes().to_vec(), decode_u64))
        .collect();

    let executor = canned_executor(vec![
        RawResult::success(b"USD".to_vec()),
        RawResult::success(vec![6]),
        RawResult::success(1_000_000u64.to_le_bytes().to_vec()),
        RawResult::success(2_000_000u64.to_le_bytes().to_vec()),
        RawResult::success(0u64.to_le_bytes().to_vec()),
    ]);
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(results.block_number(), 19_000_000);
    assert_eq!(results.get(&symbol).unwrap(), "USD");

    let scale = 10f64.powi(*results.get(&decimals).unwrap() as i32);
    let scaled: Vec<f64> = balances
        .iter()
        .map(|handle| *results.get(handle).unwrap() as f64 / scale)
        .collect();

    assert_eq!(scaled, vec![1.0, 2.0, 0.0]);
}

#[tokio::test]
async fn optional_calls_deliver_failures_as_none() {
    let mut batch = Multicall::new();
    let missing = batch.add_raw_optional(TOKEN, SYMBOL, vec![], decode_string);
    let present = batch.add_raw_optional(TOKEN, DECIMALS, vec![], decode_u8);
    let unknown = batch.add_raw_optional(TOKEN, BALANCE_OF, vec![], decode_u64);

    let executor = canned_executor(vec![
        RawResult::failure(CallResultStatus::Reverted, b"no code".to_vec()),
        RawResult::success(vec![6]),
        RawResult::failure(CallResultStatus::MethodNotFound, vec![]),
    ]);
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(*results.get(&missing).unwrap(), None);
    assert_eq!(*results.get(&present).unwrap(), Some(6));
    assert_eq!(*results.get(&unknown).unwrap(), None);
    assert!(results.is_complete());
}

#[tokio::test]
async fn required_call_failure_rejects_the_batch() {
    let mut batch = Multicall::new();
    batch.add_raw_optional(TOKEN, SYMBOL, vec![], decode_string);
    batch.add_raw(TOKEN, DECIMALS, vec![], decode_u8);

    let executor = canned_executor(vec![
        RawResult::failure(CallResultStatus::Reverted, vec![]),
        RawResult::failure(CallResultStatus::Reverted, b"paused".to_vec()),
    ]);
    let err = batch.execute(&executor).await.unwrap_err();

    assert!(err.is_transport_level());
    match err {
        MulticallError::CallFailed {
            index,
            status,
            payload,
        } => {
            assert_eq!(index, 1);
            assert_eq!(status, CallResultStatus::Reverted);
            assert_eq!(payload, b"paused".to_vec());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_status_bytes_count_as_failures() {
    let mut batch = Multicall::new();
    let handle = batch.add_raw_optional(TOKEN, DECIMALS, vec![], decode_u8);

    let executor = canned_executor(vec![RawResult {
        status: 200,
        return_data: vec![6],
    }]);
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(*results.get(&handle).unwrap(), None);
}

/// Encodes a holder name as bytes, refusing empty names.
struct NamedBalance;

impl ReadMethod for NamedBalance {
    const SELECTOR: u64 = call_selector!("namedBalance");

    type Args = String;
    type Output = u64;

    fn encode_args(name: Self::Args) -> Result<Vec<u8>, io::Error> {
        if name.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty name"));
        }
        Ok(name.into_bytes())
    }

    fn decode_args(bytes: &[u8]) -> Result<Self::Args, io::Error> {
        decode_string(bytes)
    }

    fn encode_output(output: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(output.to_le_bytes().to_vec())
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        decode_u64(bytes)
    }
}

#[tokio::test]
async fn typed_methods_encode_and_decode_through_the_definition() {
    let mut batch = Multicall::new();
    let alice = batch.add::<NamedBalance>(TOKEN, "alice".to_string());
    let bob = batch.add_optional::<NamedBalance>(TOKEN, "bob".to_string());

    let executor = MockExecutor::new(|calls: &[EncodedCall]| {
        Ok(RawResponse {
            block_number: 3,
            results: calls
                .iter()
                .map(|call| {
                    assert_eq!(call.selector, NamedBalance::SELECTOR);
                    let name = NamedBalance::decode_args(&call.arguments)?;
                    NamedBalance::encode_output(name.len() as u64).map(RawResult::success)
                })
                .collect::<Result<Vec<_>, io::Error>>()?,
        })
    });
    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(*results.get(&alice).unwrap(), 5);
    assert_eq!(*results.get(&bob).unwrap(), Some(3));
}

#[tokio::test]
async fn argument_encoding_failure_is_reported_before_sending() {
    let mut batch = Multicall::new();
    batch.add::<NamedBalance>(TOKEN, "alice".to_string());
    batch.add::<NamedBalance>(TOKEN, String::new());

    // Enqueueing never fails; the descriptor just has no arguments.
    assert_eq!(batch.len(), 2);
    assert!(batch.descriptors()[1].arguments().is_none());

    let executor = echo_executor();
    let err = batch.execute(&executor).await.unwrap_err();

    match err {
        MulticallError::Encode { index, cause } => {
            assert_eq!(index, 1);
            assert_eq!(cause.kind(), io::ErrorKind::InvalidInput);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(executor.aggregate_count(), 0);
}

#[tokio::test]
async fn executors_can_be_shared_behind_arc() {
    let executor = std::sync::Arc::new(echo_executor());

    let mut batch = Multicall::new();
    let handle = batch.add_raw(TOKEN, DECIMALS, vec![18], decode_u8);

    let results = batch.execute(&executor).await.unwrap();

    assert_eq!(*results.get(&handle).unwrap(), 18);
    assert_eq!(results.block_number(), 7);
    assert_eq!(executor.aggregate_count(), 1);
}
