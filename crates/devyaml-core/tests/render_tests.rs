//! End-to-end rendering tests for devyaml-core.

use devyaml_core::prelude::*;

fn wifi_block() -> Mapping {
    Mapping::new()
        .with("ssid", "MyWifi")
        .with("password", "secret")
        .with_order(KeyOrder::pinned(["ssid", "password"]))
}

#[test]
fn test_wifi_document() {
    let mut root = Mapping::new();
    root.insert("wifi", wifi_block());

    assert_eq!(
        render_to_text(&root),
        "wifi:\n  ssid: MyWifi\n  password: secret\n"
    );
}

#[test]
fn test_sensor_sequence_document() {
    let order = KeyOrder::pinned(["platform", "pin"]);
    let sensors = Sequence::new()
        .with(
            Mapping::new()
                .with("platform", "dht")
                .with("pin", "D1")
                .with_order(order.clone()),
        )
        .with(
            Mapping::new()
                .with("platform", "gpio")
                .with("pin", "D2")
                .with_order(order),
        );
    let root = Mapping::new().with("sensor", sensors);

    assert_eq!(
        render_to_text(&root),
        "sensor:\n  - platform: dht\n    pin: D1\n  - platform: gpio\n    pin: D2\n"
    );
}

#[test]
fn test_numeric_looking_string_is_quoted() {
    let node = Node::string("123").with_name("version");
    assert_eq!(node.render(), "version: \"123\"");

    let number = Node::int(123).with_name("version");
    assert_eq!(number.render(), "version: 123");
}

#[test]
fn test_colon_string_is_quoted() {
    assert_eq!(Node::string("hello: world").render(), "\"hello: world\"");
}

#[test]
fn test_boolean_renders_plain() {
    let root = Mapping::new().with("enabled", true);
    assert_eq!(render_to_text(&root), "enabled: true\n");
}

#[test]
fn test_secret_renders_tag() {
    let root = Mapping::new().with("password", Node::secret("wifi_password"));
    assert_eq!(render_to_text(&root), "password: !secret wifi_password\n");
}

#[test]
fn test_three_line_literal_block() {
    let lambda = Node::literal("if (x) {\n  return 1;\n}");
    let root = Mapping::new().with(
        "lambda_block",
        Mapping::new().with("lambda", lambda),
    );

    assert_eq!(
        render_to_text(&root),
        "lambda_block:\n  lambda: |-\n    if (x) {\n      return 1;\n    }\n"
    );
}

#[test]
fn test_sequence_of_n_items_has_n_dash_lines() {
    for n in [1usize, 3, 12] {
        let items: Sequence = (0..n).map(|i| format!("GPIO{i}")).collect();
        let root = Mapping::new().with("pins", items);
        let text = render_to_text(&root);
        let dash_lines = text
            .lines()
            .filter(|line| line.trim_start().starts_with("- "))
            .count();
        assert_eq!(dash_lines, n, "{text}");
    }
}

#[test]
fn test_rendering_is_idempotent() {
    let mut root = Mapping::new();
    root.insert("wifi", wifi_block());
    root.insert(
        "logger",
        Node::from(Mapping::new().with("level", "DEBUG")).with_comment("verbose while testing"),
    );

    let first = render_to_text(&root);
    let second = render_to_text(&root);
    assert_eq!(first, second);
}

#[test]
fn test_insertion_order_does_not_change_output() {
    let a = Mapping::new().with("b", 1).with("a", 2).with("c", 3);
    let b = Mapping::new().with("c", 3).with("a", 2).with("b", 1);
    assert_eq!(render_to_text(&a), render_to_text(&b));
}

#[test]
fn test_custom_key_order() {
    fn reversed(mut keys: Vec<&str>) -> Vec<&str> {
        keys.reverse();
        keys
    }

    let root = Mapping::new()
        .with("a", 1)
        .with("b", 2)
        .with("c", 3)
        .with_order(KeyOrder::Custom(reversed));
    assert_eq!(render_to_text(&root), "c: 3\n\nb: 2\n\na: 1\n");
}

#[test]
fn test_mutation_api_builds_nested_tree() {
    let mut root = Node::mapping();
    root.set_child("sensor", Node::sequence()).unwrap();

    let sensor = root.as_mapping_mut().and_then(|m| m.get_mut("sensor")).unwrap();
    sensor
        .append_item(Mapping::new().with("platform", "uptime"))
        .unwrap();

    assert_eq!(root.lookup("sensor.0.platform").unwrap().render(), "platform: uptime");
    assert_eq!(render_document(&root), "sensor:\n  - platform: uptime\n");
}

#[test]
fn test_structural_misuse_is_reported() {
    let mut scalar = Node::string("x").with_name("ssid");
    let err = scalar.set_child("k", 1).unwrap_err();
    assert!(matches!(err, DocumentError::NotAMapping { .. }));

    let root = Node::from(Mapping::new().with("a", 1));
    assert!(matches!(
        root.lookup("missing"),
        Err(DocumentError::PathNotFound { .. })
    ));
}

#[test]
fn test_comments_round_out_a_device_file() {
    let wifi = Node::from(wifi_block()).with_comment("Network");
    let logger = Node::from(Mapping::new().with("level", "INFO"))
        .with_inline_comment("keep quiet in production");
    let root = Mapping::new()
        .with("wifi", wifi)
        .with("logger", logger)
        .with_order(KeyOrder::pinned(["wifi", "logger"]));

    assert_eq!(
        render_to_text(&root),
        "# Network\nwifi:\n  ssid: MyWifi\n  password: secret\n\n\
         logger:  # keep quiet in production\n  level: INFO\n"
    );
}

#[test]
fn test_json_view_follows_render_order() {
    let node = Node::from(wifi_block());
    let json = serde_json::to_string(&node).unwrap();
    assert_eq!(json, r#"{"ssid":"MyWifi","password":"secret"}"#);
}
