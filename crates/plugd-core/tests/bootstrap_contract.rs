//! Contract Test: Handler Chain Assembly
//!
//! Constraints verified:
//! - Chains follow configuration order and pass arguments through verbatim
//! - Unknown plugins and missing family support are configuration errors
//! - Setup failures surface with the plugin's own message
//! - Only configured families are assembled

mod common;

use common::*;
use plugd_core::config::{ListenerConfig, PluginConfig, ServerConfig};
use plugd_core::{
    Error, Message4, Message6, Plugin, PluginRegistry, ProtocolFamily, build_server,
    load_plugins4, load_plugins6,
};

fn tag_registry(setup: &CountingSetup) -> PluginRegistry {
    let mut registry = static_and_dns_registry();
    registry
        .register(
            Plugin::new("tag")
                .with_setup4(setup.clone())
                .with_setup6(setup.clone()),
        )
        .unwrap();
    registry
}

#[tokio::test]
async fn chain_preserves_configuration_order() {
    let setup = CountingSetup::new();
    let registry = tag_registry(&setup);

    let plugins = vec![
        PluginConfig::new("tag", ["3"]),
        PluginConfig::new("tag", ["1"]),
        PluginConfig::new("tag", ["2"]),
    ];
    let handlers = load_plugins4(&registry, &plugins).expect("chain loads");
    assert_eq!(handlers.len(), 3);
    assert_eq!(setup.call_count(), 3);

    let request = Message4::new(42, vec![0xaau8; 6]);
    let response = run_chain4(&handlers, &request).await.expect("response");
    assert_eq!(response.xid, 42);
    assert_eq!(response.option(TAG_OPTION4), Some(&[3u8, 1, 2][..]));
}

#[tokio::test]
async fn v6_chain_uses_v6_setup() {
    let setup = CountingSetup::new();
    let registry = tag_registry(&setup);

    let handlers = load_plugins6(&registry, &[PluginConfig::new("tag", ["9"])]).unwrap();
    let response = run_chain6(&handlers, &Message6::new([1, 2, 3]))
        .await
        .unwrap();
    assert_eq!(response.option(TAG_OPTION6), Some(&[9u8][..]));
}

#[test]
fn unknown_plugin_is_configuration_error() {
    let registry = static_and_dns_registry();
    let err = load_plugins4(&registry, &[PluginConfig::new("missing", ["x"])])
        .err()
        .expect("unknown plugin fails");
    assert!(matches!(err, Error::UnknownPlugin(ref name) if name == "missing"));
    assert!(!err.is_fatal());
}

#[test]
fn v4_only_plugin_cannot_join_v6_chain() {
    let registry = static_and_dns_registry();
    let err = load_plugins6(&registry, &[PluginConfig::new("static", ["leases.txt"])])
        .err()
        .expect("static has no DHCPv6 setup");
    assert_eq!(err.to_string(), "Plugin 'static' does not support DHCPv6");
}

#[test]
fn setup_failure_keeps_plugin_message() {
    let setup = CountingSetup::new();
    let registry = tag_registry(&setup);

    let err = load_plugins4(
        &registry,
        &[
            PluginConfig::new("dns", ["8.8.8.8"]),
            PluginConfig::new("tag", ["1", "2"]),
        ],
    )
    .err()
    .expect("bad argument count fails");

    match err {
        Error::Setup { plugin, message } => {
            assert_eq!(plugin, "tag");
            assert_eq!(message, "want exactly 1 argument, got 2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn build_server_assembles_configured_families_only() {
    let setup = CountingSetup::new();
    let registry = tag_registry(&setup);

    let config = ServerConfig {
        server4: Some(
            ListenerConfig::new(ProtocolFamily::V4)
                .with_plugin(PluginConfig::new("static", Vec::<String>::new()))
                .with_plugin(PluginConfig::new("tag", ["5"])),
        ),
        server6: None,
    };
    config.validate().unwrap();

    let handlers = build_server(&registry, &config).expect("server builds");
    assert_eq!(handlers.handlers4.len(), 2);
    assert!(handlers.handlers6.is_empty());
}
