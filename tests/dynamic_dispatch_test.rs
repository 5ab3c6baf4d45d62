mod common;

use paygate::application::gateway::Gateway;
use paygate::domain::payment::{Amount, Pan};
use paygate::domain::ports::{LogSinkBox, TransportBox};
use paygate::domain::request::RequestBody;
use paygate::infrastructure::in_memory::{MemoryLogSink, ScriptedTransport};
use paygate::infrastructure::tracing_sink::TracingLogSink;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let scripted = ScriptedTransport::new();
    for id in ["1", "2"] {
        scripted
            .push_reply(common::reply(&[("txnresult", "AUTHORISED"), ("transactionid", id)]))
            .await;
    }

    let transport: TransportBox = Box::new(scripted.clone());
    let sink: LogSinkBox = Box::new(MemoryLogSink::new());
    let gateway = Arc::new(Gateway::new(common::config("https://gateway.test/ws"), transport).with_log_sink(sink));

    // Verify Send + Sync by spawning tasks
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move {
                gateway
                    .authorise(Pan::new("4111111111111111"), "123", "2512", Amount::new(dec!(1.00)).unwrap(), "")
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert!(response.is_authorised());
        ids.push(response.transaction_id());
    }
    ids.sort();

    assert_eq!(ids, vec![1, 2]);
    assert_eq!(scripted.requests().await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_get_the_reply_paired_with_their_request() {
    let scripted = ScriptedTransport::new();
    for id in 1..=16 {
        scripted
            .push_reply(common::reply(&[("txnresult", "AUTHORISED"), ("transactionid", &id.to_string())]))
            .await;
    }

    let transport: TransportBox = Box::new(scripted.clone());
    let gateway = Arc::new(Gateway::new(common::config("https://gateway.test/ws"), transport));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move {
                let reference = format!("order-{}", i);
                let response = gateway
                    .authorise(Pan::new("4111111111111111"), "123", "2512", Amount::new(dec!(1.00)).unwrap(), &reference)
                    .await
                    .unwrap();
                (reference, response.transaction_id())
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    let sent = scripted.requests().await;
    assert_eq!(sent.len(), 16);

    for (reference, transaction_id) in results {
        match sent[(transaction_id - 1) as usize].message() {
            RequestBody::Authorization(body) => assert_eq!(body.merchant_reference(), reference),
            other => panic!("unexpected body: {:?}", other),
        }
    }
}

#[test]
fn test_tracing_sink_boxes_as_log_sink() {
    let sink: LogSinkBox = Box::new(TracingLogSink::new());
    sink.log(tracing::Level::INFO, "Request:\n<pan>411111****1111</pan>");
}
