use localrag_core::config::GenerationSettings;
use localrag_core::traits::AnswerProvider;
use localrag_core::Error;
use localrag_llm::OpenAiChat;

#[test]
fn missing_api_key_is_a_provider_error() {
    let mut settings = GenerationSettings::default();
    settings.endpoint.api_key = Some("   ".to_string());
    let chat = OpenAiChat::new(&settings).expect("client builds");

    let err = chat.generate("prompt").unwrap_err();
    assert!(matches!(err, Error::Provider { .. }), "got {err:?}");
    assert_eq!(chat.model(), "gpt-3.5-turbo");
}

#[test]
fn unreachable_endpoint_is_a_provider_error() {
    let mut settings = GenerationSettings::default();
    settings.endpoint.api_key = Some("sk-test".to_string());
    settings.endpoint.base_url = "http://127.0.0.1:9/v1/".to_string();
    settings.endpoint.timeout_secs = 2;
    let chat = OpenAiChat::new(&settings).expect("client builds");

    match chat.generate("prompt") {
        Err(Error::Provider { provider, message }) => {
            assert_eq!(provider, chat.name());
            assert!(message.contains("http://127.0.0.1:9/v1/chat/completions"), "{message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
