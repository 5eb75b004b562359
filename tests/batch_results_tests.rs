use muxcall::{
    BatchResults, CallHandle, EncodedCall, Multicall, MulticallError, RawResponse, RawResult,
    RemoteCallExecutor,
};
use std::io;

/// Answers each call with its own argument bytes at block 42.
struct EchoExecutor;

#[async_trait::async_trait]
impl RemoteCallExecutor for EchoExecutor {
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error> {
        Ok(RawResponse {
            block_number: 42,
            results: calls
                .into_iter()
                .map(|call| RawResult::success(call.arguments))
                .collect(),
        })
    }
}

fn decode_text(bytes: &[u8]) -> Result<String, io::Error> {
    String::from_utf8(bytes.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn decode_len(bytes: &[u8]) -> Result<usize, io::Error> {
    if bytes.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no data"));
    }
    Ok(bytes.len())
}

async fn sample_results() -> (
    BatchResults,
    CallHandle<String>,
    CallHandle<usize>,
    CallHandle<usize>,
) {
    let mut batch = Multicall::new();
    let text = batch.add_raw("0xA", 1, b"USDC".to_vec(), decode_text);
    let len = batch.add_raw("0xA", 2, vec![0; 4], decode_len);
    let broken = batch.add_raw("0xA", 2, vec![], decode_len);

    let results = batch.execute(&EchoExecutor).await.unwrap();
    (results, text, len, broken)
}

#[tokio::test]
async fn get_reads_values_without_consuming_them() {
    let (results, text, len, _) = sample_results().await;

    assert_eq!(results.block_number(), 42);
    assert_eq!(results.len(), 3);
    assert!(!results.is_empty());

    assert_eq!(results.get(&text).unwrap(), "USDC");
    assert_eq!(results.get(&text).unwrap(), "USDC");
    assert_eq!(*results.get(&len).unwrap(), 4);
    assert_eq!(*results.get_at::<usize>(1).unwrap(), 4);
}

#[tokio::test]
async fn get_at_with_the_wrong_type_is_a_mismatch() {
    let (results, ..) = sample_results().await;

    let err = results.get_at::<u64>(0).unwrap_err();
    assert!(matches!(err, MulticallError::TypeMismatch { index: 0 }));

    let err = results.get_at::<String>(3).unwrap_err();
    assert!(matches!(
        err,
        MulticallError::IndexOutOfRange { index: 3, len: 3 }
    ));
}

#[tokio::test]
async fn take_moves_the_value_out_once() {
    let (mut results, text, len, _) = sample_results().await;

    assert_eq!(results.take(text).unwrap(), "USDC");

    let err = results.take(text).unwrap_err();
    assert!(matches!(err, MulticallError::AlreadyTaken { index: 0 }));
    assert!(matches!(
        results.get(&text).unwrap_err(),
        MulticallError::AlreadyTaken { index: 0 }
    ));

    // Other positions are unaffected.
    assert_eq!(results.take(len).unwrap(), 4);
}

#[tokio::test]
async fn take_keeps_decode_failures_in_place() {
    let (mut results, _, _, broken) = sample_results().await;

    for _ in 0..2 {
        match results.take(broken).unwrap_err() {
            MulticallError::Decode(err) => {
                assert_eq!(err.index, 2);
                assert_eq!(err.cause.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(results.decode_errors().count(), 1);
}

#[tokio::test]
async fn into_values_keeps_every_position() {
    let (mut results, text, _, _) = sample_results().await;
    results.take(text).unwrap();

    let values = results.into_values();
    assert_eq!(values.len(), 3);

    assert!(matches!(
        values[0],
        Err(MulticallError::AlreadyTaken { index: 0 })
    ));
    let len = values[1].as_ref().unwrap().downcast_ref::<usize>().unwrap();
    assert_eq!(*len, 4);
    assert!(matches!(values[2], Err(MulticallError::Decode(_))));
}

#[tokio::test]
async fn complete_batches_pass_into_complete() {
    let mut batch = Multicall::new();
    let first = batch.add_raw("0xB", 7, b"a".to_vec(), decode_text);
    let second = batch.add_raw("0xB", 7, b"b".to_vec(), decode_text);

    let results = batch
        .execute(&EchoExecutor)
        .await
        .and_then(BatchResults::into_complete)
        .unwrap();

    assert!(results.is_complete());
    assert_eq!(results.get(&first).unwrap(), "a");
    assert_eq!(results.get(&second).unwrap(), "b");
}
