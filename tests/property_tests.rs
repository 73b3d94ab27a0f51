use greetsrv::{EchoResponder, GreetClient, ResponderConfig, greet};
use proptest::prelude::*;
use std::time::Duration;

async fn start_test_responder()
-> Result<(tokio::task::JoinHandle<greetsrv::Result<()>>, String), TestCaseError> {
    let config = ResponderConfig {
        bind_addr: "tcp://127.0.0.1:0"
            .parse()
            .map_err(|e| TestCaseError::fail(format!("Bad endpoint: {}", e)))?,
        ..Default::default()
    };
    let responder = EchoResponder::start(config)
        .await
        .map_err(|e| TestCaseError::fail(format!("Responder setup failed: {}", e)))?;
    let endpoint = responder.local_endpoint().to_string();
    Ok((tokio::spawn(responder.serve_forever()), endpoint))
}

proptest! {
    /// Property: the reply is the request wrapped in "Hello, " and "!"
    #[test]
    fn greet_wraps_any_text(name in ".*") {
        let reply = greet(&name);
        prop_assert!(reply.starts_with("Hello, "));
        prop_assert!(reply.ends_with('!'));
        prop_assert_eq!(&reply["Hello, ".len()..reply.len() - 1], name.as_str());
    }

    /// Property: greet has no hidden state
    #[test]
    fn greet_is_idempotent(name in ".*") {
        prop_assert_eq!(greet(&name), greet(&name));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: any text sent over the wire comes back greeted, unmangled
    #[test]
    fn responder_greets_any_text(name in "\\PC{0,64}") {
        tokio_test::block_on(async {
            let (server_handle, endpoint) = start_test_responder().await?;

            let mut client = GreetClient::connect(&endpoint).await
                .map_err(|e| TestCaseError::fail(format!("Client connection failed: {}", e)))?
                .with_timeout(Duration::from_secs(5));

            let reply = client.request(&name).await
                .map_err(|e| TestCaseError::fail(format!("Request failed: {}", e)))?;

            server_handle.abort();

            prop_assert_eq!(reply, format!("Hello, {}!", name));
            Ok(())
        })?;
    }

    /// Property: a batch of requests on one client is answered in order
    #[test]
    fn responder_answers_in_order(names in prop::collection::vec("[a-zA-Z0-9 ]{0,16}", 1..10)) {
        tokio_test::block_on(async {
            let (server_handle, endpoint) = start_test_responder().await?;

            let mut client = GreetClient::connect(&endpoint).await
                .map_err(|e| TestCaseError::fail(format!("Client connection failed: {}", e)))?
                .with_timeout(Duration::from_secs(5));

            for name in &names {
                let reply = client.request(name).await
                    .map_err(|e| TestCaseError::fail(format!("Request failed: {}", e)))?;
                prop_assert_eq!(reply, greet(name));
            }

            server_handle.abort();
            Ok(())
        })?;
    }
}
