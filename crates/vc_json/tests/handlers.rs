use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use vc_json::adapter::{
    JsonDeserializer, JsonSerializer, TypeAdapter, TypeAdapterFactory, TypeAdapterProvider,
    TypeHandler,
};
use vc_json::context::{ReaderContext, WriterContext};
use vc_json::types::{RawType, TypeDescriptor};
use vc_json::{Error, ErrorKind, Gson, GsonBuilder, Result};
use vc_object::{ClassDef, ClassLoader, Directive, PropertyDef, Value};

fn builder(classes: impl IntoIterator<Item = Arc<ClassDef>>) -> GsonBuilder {
    let mut loader = ClassLoader::new();
    for class in classes {
        loader.register(class);
    }
    Gson::builder().set_class_loader(loader)
}

fn money() -> Arc<ClassDef> {
    ClassDef::builder("Money")
        .property(PropertyDef::new("amount").typed("int"))
        .property(PropertyDef::new("currency").typed("string"))
        .build()
}

fn wallet() -> Arc<ClassDef> {
    ClassDef::builder("Wallet")
        .property(PropertyDef::new("owner").typed("string"))
        .property(PropertyDef::new("balance").typed("Money"))
        .build()
}

// -----------------------------------------------------------------------------
// Codecs

/// Writes `Money` as `"12 EUR"`.
struct MoneyText {
    class: Arc<ClassDef>,
}

impl JsonSerializer for MoneyText {
    fn serialize(
        &self,
        value: &Value,
        _ty: &TypeDescriptor,
        ctx: &mut WriterContext<'_>,
    ) -> Result<JsonValue> {
        let object = value
            .as_object()
            .ok_or_else(|| ctx.unsupported("Money", value.kind()))?;
        let object = object.read();
        let amount = object.get("amount").and_then(Value::as_int).unwrap_or(0);
        let currency = object.get("currency").and_then(Value::as_str).unwrap_or("");
        Ok(JsonValue::String(format!("{amount} {currency}")))
    }
}

impl JsonDeserializer for MoneyText {
    fn deserialize(
        &self,
        json: &JsonValue,
        _ty: &TypeDescriptor,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        let text = json
            .as_str()
            .ok_or_else(|| ctx.structural("money text expected"))?;
        let (amount, currency) = text
            .split_once(' ')
            .ok_or_else(|| ctx.structural(format!("malformed money `{text}`")))?;
        let amount: i64 = amount.parse().map_err(Error::custom)?;

        let object = self.class.new_object()?;
        object.write().set("amount", Value::Int(amount))?;
        object.write().set("currency", Value::from(currency))?;
        Ok(Value::Object(object))
    }
}

/// Writes a list of strings as one comma separated string.
struct Csv;

impl JsonSerializer for Csv {
    fn serialize(
        &self,
        value: &Value,
        _ty: &TypeDescriptor,
        _ctx: &mut WriterContext<'_>,
    ) -> Result<JsonValue> {
        let items = value.as_list().unwrap_or_default();
        let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
        Ok(JsonValue::String(parts.join(",")))
    }
}

impl JsonDeserializer for Csv {
    fn deserialize(
        &self,
        json: &JsonValue,
        _ty: &TypeDescriptor,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        let text = json
            .as_str()
            .ok_or_else(|| ctx.structural("csv string expected"))?;
        Ok(Value::List(text.split(',').map(Value::from).collect()))
    }
}

/// Writes strings in upper case, reads them unchanged.
struct Shout;

impl TypeAdapter for Shout {
    fn read(&self, json: &JsonValue, _ctx: &mut ReaderContext<'_>) -> Result<Value> {
        Ok(json.as_str().map(Value::from).unwrap_or_default())
    }

    fn write(&self, value: &Value, _ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        Ok(match value.as_str() {
            Some(text) => JsonValue::String(text.to_uppercase()),
            None => JsonValue::Null,
        })
    }
}

/// Serves [`Shout`] for every `string`.
struct ShoutFactory;

impl TypeAdapterFactory for ShoutFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok((*ty.raw() == RawType::String).then(|| Arc::new(Shout) as Arc<dyn TypeAdapter>))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn registered_handler_replaces_reflection() {
    let money = money();
    let codec = || MoneyText {
        class: money.clone(),
    };
    let gson = builder([money.clone(), wallet()])
        .register_type("Money", TypeHandler::both(codec(), codec()), true)
        .build()
        .unwrap();

    let json = r#"{"owner":"ann","balance":"12 EUR"}"#;
    let value = gson.from_json(json, "Wallet").unwrap();
    let balance = value.as_object().unwrap().read().get("balance").cloned().unwrap();
    let balance = balance.as_object().unwrap().read();
    assert_eq!(balance.get("amount"), Some(&Value::Int(12)));
    assert_eq!(balance.get("currency"), Some(&Value::from("EUR")));
    drop(balance);

    assert_eq!(gson.to_json(&value).unwrap(), json);

    let err = gson
        .from_json(r#"{"balance":"twelve"}"#, "Wallet")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "malformed money `twelve` at $.balance");
}

#[test]
fn single_half_falls_back_to_default_codec() {
    let money = money();
    let gson = builder([money.clone(), wallet()])
        .register_type("Money", TypeHandler::serializer(MoneyText { class: money }), true)
        .build()
        .unwrap();

    let value = gson
        .from_json(
            r#"{"balance":{"amount":3,"currency":"USD"}}"#,
            "Wallet",
        )
        .unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"balance":"3 USD"}"#);
}

#[test]
fn loose_registration_covers_subclasses() {
    let money = money();
    let coin = ClassDef::builder("Coin")
        .extends(money.clone())
        .property(PropertyDef::new("year").typed("int"))
        .build();
    let json = r#"{"amount":1,"currency":"EUR","year":2002}"#;

    let handler = || {
        TypeHandler::serializer(MoneyText {
            class: money.clone(),
        })
    };

    let loose = builder([money.clone(), coin.clone()])
        .register_type("Money", handler(), false)
        .build()
        .unwrap();
    let value = loose.from_json(json, "Coin").unwrap();
    assert_eq!(loose.to_json(&value).unwrap(), r#""1 EUR""#);

    let strict = builder([money.clone(), coin])
        .register_type("Money", handler(), true)
        .build()
        .unwrap();
    let value = strict.from_json(json, "Coin").unwrap();
    assert_eq!(strict.to_json(&value).unwrap(), r#"{"year":2002,"amount":1,"currency":"EUR"}"#);
}

#[test]
fn class_exclusion_applies_before_handlers() {
    let money = ClassDef::builder("Money")
        .directive(Directive::Exclude {
            serialize: true,
            deserialize: false,
        })
        .property(PropertyDef::new("amount").typed("int"))
        .property(PropertyDef::new("currency").typed("string"))
        .build();
    let codec = || MoneyText {
        class: money.clone(),
    };
    let gson = builder([money.clone(), wallet()])
        .register_type("Money", TypeHandler::both(codec(), codec()), false)
        .build()
        .unwrap();

    let value = gson
        .from_json(r#"{"owner":"ann","balance":"12 EUR"}"#, "Wallet")
        .unwrap();
    let balance = value.as_object().unwrap().read().get("balance").cloned().unwrap();
    assert_eq!(
        balance.as_object().unwrap().read().get("amount"),
        Some(&Value::Int(12))
    );

    assert_eq!(gson.to_json(&value).unwrap(), r#"{"owner":"ann"}"#);
    assert_eq!(gson.to_json(&balance).unwrap(), "null");
}

#[test]
fn named_handler_on_a_property() {
    let post = ClassDef::builder("Post")
        .property(
            PropertyDef::new("tags")
                .typed("list<string>")
                .directive(Directive::JsonAdapter(String::from("csv"))),
        )
        .property(PropertyDef::new("aliases").typed("list<string>"))
        .build();
    let gson = builder([post])
        .register_named_handler("csv", TypeHandler::both(Csv, Csv))
        .build()
        .unwrap();

    let json = r#"{"tags":"a,b","aliases":["x"]}"#;
    let value = gson.from_json(json, "Post").unwrap();
    let tags = value.as_object().unwrap().read().get("tags").cloned().unwrap();
    assert_eq!(tags, Value::List(vec![Value::from("a"), Value::from("b")]));

    assert_eq!(gson.to_json(&value).unwrap(), json);
}

#[test]
fn named_handler_on_a_class() {
    let money = ClassDef::builder("Money")
        .directive(Directive::JsonAdapter(String::from("money")))
        .property(PropertyDef::new("amount").typed("int"))
        .property(PropertyDef::new("currency").typed("string"))
        .build();
    let codec = || MoneyText {
        class: money.clone(),
    };
    let gson = builder([money.clone(), wallet()])
        .register_named_handler("money", TypeHandler::both(codec(), codec()))
        .build()
        .unwrap();

    let json = r#"{"owner":"bob","balance":"5 GBP"}"#;
    let value = gson.from_json(json, "Wallet").unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), json);

    let value = gson.from_json(r#""7 JPY""#, "Money").unwrap();
    assert_eq!(gson.to_json_value(&value).unwrap(), json!("7 JPY"));
}

#[test]
fn unknown_named_handler_is_a_configuration_error() {
    let post = ClassDef::builder("Post")
        .property(
            PropertyDef::new("tags")
                .typed("list<string>")
                .directive(Directive::JsonAdapter(String::from("missing"))),
        )
        .build();
    let gson = builder([post]).build().unwrap();

    let err = gson.from_json(r#"{"tags":"a"}"#, "Post").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn user_factories_come_first() {
    let gson = builder([wallet(), money()])
        .add_type_adapter_factory(ShoutFactory)
        .build()
        .unwrap();

    let value = gson.from_json(r#"{"owner":"ann"}"#, "Wallet").unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"owner":"ANN"}"#);
    assert_eq!(gson.to_json(&Value::from("hi")).unwrap(), r#""HI""#);
}

#[test]
fn adapter_handlers_are_used_as_is() {
    let gson = builder([wallet(), money()])
        .register_type("string", TypeHandler::adapter(Shout), true)
        .build()
        .unwrap();

    let list = gson.from_json(r#"["a","b"]"#, "list<string>").unwrap();
    assert_eq!(gson.to_json(&list).unwrap(), r#"["A","B"]"#);
}
