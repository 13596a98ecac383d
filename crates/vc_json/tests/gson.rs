use std::sync::Arc;

use serde_json::json;
use vc_json::context::Attributes;
use vc_json::exclusion::{ExclusionData, ExclusionStrategy};
use vc_json::metadata::{ClassMetadata, PropertyMetadata};
use vc_json::types::TypeDescriptor;
use vc_json::{ErrorKind, Gson, GsonBuilder, Result};
use vc_object::{ClassDef, ClassLoader, Directive, MethodDef, ObjectRef, PropertyDef, Value};

fn loader(classes: impl IntoIterator<Item = Arc<ClassDef>>) -> ClassLoader {
    let mut loader = ClassLoader::new();
    for class in classes {
        loader.register(class);
    }
    loader
}

fn gson(classes: impl IntoIterator<Item = Arc<ClassDef>>) -> Gson {
    builder(classes).build().unwrap()
}

fn builder(classes: impl IntoIterator<Item = Arc<ClassDef>>) -> GsonBuilder {
    Gson::builder().set_class_loader(loader(classes))
}

fn get(object: &Value, name: &str) -> Value {
    object.as_object().unwrap().read().get(name).cloned().unwrap()
}

// -----------------------------------------------------------------------------
// Classes

fn address() -> Arc<ClassDef> {
    ClassDef::builder("Address")
        .property(PropertyDef::new("street").typed("string"))
        .property(PropertyDef::new("zipCode").typed("int"))
        .build()
}

fn person() -> Arc<ClassDef> {
    ClassDef::builder("Person")
        .property(PropertyDef::new("fullName").typed("string"))
        .property(PropertyDef::new("age").typed("int"))
        .property(PropertyDef::new("address").typed("Address"))
        .property(PropertyDef::new("tags").typed("list<string>"))
        .property(PropertyDef::new("scores").typed("map<string,float>"))
        .build()
}

fn sample() -> Arc<ClassDef> {
    ClassDef::builder("Sample")
        .property(PropertyDef::new("integer").typed("int"))
        .property(PropertyDef::new("name").typed("string"))
        .build()
}

fn shapes() -> [Arc<ClassDef>; 2] {
    let shape = ClassDef::builder("Shape")
        .property(PropertyDef::new("name").typed("string"))
        .mark_abstract()
        .build();
    let circle = ClassDef::builder("Circle")
        .extends(shape.clone())
        .property(PropertyDef::new("radius").typed("int").default_value(1))
        .build();
    [shape, circle]
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn nested_round_trip() {
    let gson = gson([address(), person()]);
    let json = r#"{"full_name":"Ann","age":31,"address":{"street":"Main","zip_code":1000},"tags":["a","b"],"scores":{"math":9.5}}"#;

    let value = gson.from_json(json, "Person").unwrap();
    assert_eq!(get(&value, "fullName"), Value::from("Ann"));
    assert_eq!(get(&get(&value, "address"), "zipCode"), Value::Int(1000));
    assert_eq!(
        get(&value, "tags"),
        Value::List(vec![Value::from("a"), Value::from("b")])
    );

    assert_eq!(gson.to_json(&value).unwrap(), json);
}

#[test]
fn collections_of_classes() {
    let gson = gson([sample()]);
    let json = r#"{"1":[{"integer":1,"name":"a"}],"2":[]}"#;

    let value = gson.from_json(json, "map<int,list<Sample>>").unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains_key(&vc_object::MapKey::Int(1)));

    assert_eq!(gson.to_json(&value).unwrap(), json);
}

#[test]
fn unknown_keys_are_ignored() {
    let gson = gson([sample()]);
    let value = gson
        .from_json(r#"{"integer":5,"name":"a","extra":[1,2]}"#, "Sample")
        .unwrap();

    assert_eq!(gson.to_json(&value).unwrap(), r#"{"integer":5,"name":"a"}"#);
}

#[test]
fn null_properties_are_omitted_by_default() {
    let value_json = r#"{"name":"a"}"#;

    let gson = gson([sample()]);
    let value = gson.from_json(value_json, "Sample").unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"name":"a"}"#);

    let gson = builder([sample()]).serialize_null(true).build().unwrap();
    let value = gson.from_json(value_json, "Sample").unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"integer":null,"name":"a"}"#);
}

#[test]
fn inline_scalars_match_scalar_adapters() {
    let json = r#"{"integer":5,"name":"a"}"#;
    let with = gson([sample()]);
    let without = builder([sample()]).enable_scalar_adapters(false).build().unwrap();

    let a = with.from_json(json, "Sample").unwrap();
    let b = without.from_json(json, "Sample").unwrap();
    assert_eq!(a, b);
    assert_eq!(with.to_json(&a).unwrap(), without.to_json(&b).unwrap());

    let err = without
        .from_json(r#"{"integer":"5"}"#, "Sample")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.to_string(), "int expected but string found at $.integer");
}

#[test]
fn wildcard_properties() {
    let bag = ClassDef::builder("Bag").property(PropertyDef::new("payload")).build();
    let gson = gson([bag]);
    let json = r#"{"payload":{"a":[1,2.5,"x",true,null],"b":{}}}"#;

    let value = gson.from_json(json, "Bag").unwrap();
    let payload = get(&value, "payload");
    assert_eq!(payload.as_map().unwrap().len(), 2);

    assert_eq!(gson.to_json(&value).unwrap(), json);
}

#[test]
fn date_times_use_the_configured_format() {
    let event = ClassDef::builder("Event")
        .property(PropertyDef::new("at").typed("DateTime"))
        .build();
    let gson = builder([event])
        .set_date_time_format("%Y-%m-%d %H:%M:%S %z")
        .build()
        .unwrap();

    let json = r#"{"at":"2025-12-24 17:30:00 +0100"}"#;
    let value = gson.from_json(json, "Event").unwrap();
    assert!(matches!(get(&value, "at"), Value::DateTime(_)));
    assert_eq!(gson.to_json(&value).unwrap(), json);

    let err = gson.from_json(r#"{"at":"yesterday"}"#, "Event").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);

    let err = Gson::builder().set_date_time_format("%Y-%").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

// -----------------------------------------------------------------------------
// Errors

#[test]
fn shape_errors_carry_the_path() {
    let item = ClassDef::builder("Item")
        .property(PropertyDef::new("sku").typed("string"))
        .property(PropertyDef::new("qty").typed("int"))
        .build();
    let order = ClassDef::builder("Order")
        .property(PropertyDef::new("items").typed("list<Item>"))
        .property(PropertyDef::new("lookup").typed("map<string,int>"))
        .build();
    let gson = gson([item, order]);

    let err = gson.from_json(r#"{"items":{"a":1}}"#, "Order").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "list expected but object found at $.items");

    let err = gson.from_json(r#"{"lookup":[1]}"#, "Order").unwrap_err();
    assert_eq!(err.to_string(), "map expected but array found at $.lookup");

    let err = gson
        .from_json(r#"{"items":[{"sku":"a","qty":1},{"qty":"x"}]}"#, "Order")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.to_string(), "int expected but string found at $.items[1].qty");

    let err = gson.from_json("[]", "Order").unwrap_err();
    assert_eq!(err.to_string(), "object expected but array found at $");
}

#[test]
fn entry_point_errors() {
    let gson = gson([sample()]);

    assert_eq!(gson.from_json("{", "Sample").unwrap_err().kind(), ErrorKind::Json);
    assert_eq!(
        gson.from_json("{}", "list<Sample").unwrap_err().kind(),
        ErrorKind::Structural
    );
    assert_eq!(
        gson.from_json("{}", "Missing").unwrap_err().kind(),
        ErrorKind::ClassNotFound
    );
    assert_eq!(
        gson.from_json("{}", "list<int,int>").unwrap_err().kind(),
        ErrorKind::Structural
    );
}

#[test]
fn container_generics_are_checked() {
    let gson = gson([sample()]);

    let err = gson.from_json("{}", "map<string,int,int>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(
        err.to_string(),
        "map takes at most two generic parameters at `map<string,int,int>`"
    );

    let err = gson.from_json("[]", "array<int,int,int>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);

    for expr in ["map<bool,int>", "map<Sample,int>", "array<float,string>"] {
        let err = gson.from_json("{}", expr).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural, "{expr}");
    }
    let err = gson.from_json("{}", "map<bool,int>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "map keys must be string, int or ?, not bool at `map<bool,int>`"
    );

    let value = gson
        .from_json(r#"{"a":{"1":2}}"#, "map<string,map<int,int>>")
        .unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"a":{"1":2}}"#);
}

// -----------------------------------------------------------------------------
// Exclusion

#[test]
fn exclusion_directions() {
    let account = ClassDef::builder("Account")
        .property(PropertyDef::new("login"))
        .property(PropertyDef::new("password").directive(Directive::exclude()))
        .property(PropertyDef::new("token").directive(Directive::Exclude {
            serialize: false,
            deserialize: true,
        }))
        .property(PropertyDef::new("hash").directive(Directive::Exclude {
            serialize: true,
            deserialize: false,
        }))
        .build();
    let gson = gson([account]);

    let value = gson
        .from_json(
            r#"{"login":"a","password":"p","token":"t","hash":"h"}"#,
            "Account",
        )
        .unwrap();
    assert_eq!(get(&value, "login"), Value::from("a"));
    assert_eq!(get(&value, "password"), Value::Null);
    assert_eq!(get(&value, "token"), Value::Null);
    assert_eq!(get(&value, "hash"), Value::from("h"));

    assert_eq!(gson.to_json(&value).unwrap(), r#"{"login":"a"}"#);

    let object = value.as_object().unwrap();
    object.write().set("token", Value::from("t")).unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"login":"a","token":"t"}"#);
}

#[test]
fn expose_is_required_when_enabled() {
    let profile = ClassDef::builder("Profile")
        .property(PropertyDef::new("name").directive(Directive::expose()))
        .property(PropertyDef::new("email"))
        .build();
    let gson = builder([profile]).require_expose(true).build().unwrap();

    let value = gson
        .from_json(r#"{"name":"a","email":"a@b"}"#, "Profile")
        .unwrap();
    assert_eq!(get(&value, "email"), Value::Null);
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"name":"a"}"#);
}

fn document() -> Arc<ClassDef> {
    ClassDef::builder("Document")
        .property(PropertyDef::new("title").default_value("t"))
        .property(
            PropertyDef::new("summary")
                .default_value("s")
                .directive(Directive::Since(String::from("2.0"))),
        )
        .property(
            PropertyDef::new("legacy")
                .default_value("l")
                .directive(Directive::Until(String::from("2.0"))),
        )
        .build()
}

#[test]
fn version_gating() {
    let write = |gson: &Gson| {
        let object = gson.loader().get("Document").unwrap().new_object().unwrap();
        gson.to_json(&Value::Object(object)).unwrap()
    };

    let gson = builder([document()]).set_version("1.5").build().unwrap();
    assert_eq!(write(&gson), r#"{"title":"t","legacy":"l"}"#);

    let gson = builder([document()]).set_version("2.0").build().unwrap();
    assert_eq!(write(&gson), r#"{"title":"t","summary":"s"}"#);

    let gson = builder([document()]).build().unwrap();
    assert_eq!(write(&gson), r#"{"title":"t","summary":"s","legacy":"l"}"#);

    let err = builder([document()]).set_version("v2").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

fn holder() -> [Arc<ClassDef>; 3] {
    let secret = ClassDef::builder("Secret")
        .directive(Directive::exclude())
        .property(PropertyDef::new("code").typed("string"))
        .build();
    let draft = ClassDef::builder("Draft")
        .directive(Directive::Since(String::from("2.0")))
        .property(PropertyDef::new("text").typed("string").default_value("d"))
        .build();
    let holder = ClassDef::builder("Holder")
        .property(PropertyDef::new("name").typed("string"))
        .property(PropertyDef::new("secret").typed("Secret"))
        .property(PropertyDef::new("draft").typed("Draft"))
        .build();
    [secret, draft, holder]
}

#[test]
fn excluded_classes_are_omitted() {
    let filled = |gson: &Gson| {
        let loader = gson.loader();
        let secret = loader.get("Secret").unwrap().new_object().unwrap();
        secret.write().set("code", Value::from("x")).unwrap();
        let draft = loader.get("Draft").unwrap().new_object().unwrap();
        let holder = loader.get("Holder").unwrap().new_object().unwrap();
        {
            let mut holder = holder.write();
            holder.set("name", Value::from("h")).unwrap();
            holder.set("secret", Value::Object(secret)).unwrap();
            holder.set("draft", Value::Object(draft)).unwrap();
        }
        Value::Object(holder)
    };

    let gson = builder(holder()).set_version("1.5").build().unwrap();
    assert_eq!(gson.to_json(&filled(&gson)).unwrap(), r#"{"name":"h"}"#);

    let value = gson
        .from_json(r#"{"name":"h","secret":{"code":"x"},"draft":{"text":"d"}}"#, "Holder")
        .unwrap();
    assert_eq!(get(&value, "secret"), Value::Null);
    assert_eq!(get(&value, "draft"), Value::Null);

    let secret = get(&filled(&gson), "secret");
    assert_eq!(gson.to_json(&secret).unwrap(), "null");

    let gson = builder(holder())
        .set_version("1.5")
        .serialize_null(true)
        .build()
        .unwrap();
    assert_eq!(
        gson.to_json(&filled(&gson)).unwrap(),
        r#"{"name":"h","secret":null,"draft":null}"#
    );

    let gson = builder(holder()).set_version("2.0").build().unwrap();
    assert_eq!(
        gson.to_json(&filled(&gson)).unwrap(),
        r#"{"name":"h","draft":{"text":"d"}}"#
    );
}

struct HideFromGuests;

impl ExclusionStrategy for HideFromGuests {
    fn skip_class(&self, _: &ClassMetadata, _: &ExclusionData<'_>) -> bool {
        false
    }

    fn skip_property(&self, property: &PropertyMetadata, data: &ExclusionData<'_>) -> bool {
        let guest = data
            .attributes
            .and_then(|attributes| attributes.get("role"))
            .is_some_and(|role| role == "guest");
        guest && property.name() == "email"
    }

    fn cacheable(&self) -> bool {
        false
    }
}

#[test]
fn runtime_strategies_see_attributes() {
    let contact = ClassDef::builder("Contact")
        .property(PropertyDef::new("name").default_value("ann"))
        .property(PropertyDef::new("email").default_value("ann@example.com"))
        .build();
    let gson = builder([contact])
        .add_exclusion(HideFromGuests, true, true)
        .build()
        .unwrap();
    let object = gson.loader().get("Contact").unwrap().new_object().unwrap();
    let value = Value::Object(object);

    let mut guest = Attributes::new();
    guest.insert(String::from("role"), json!("guest"));

    assert_eq!(
        gson.to_json(&value).unwrap(),
        r#"{"name":"ann","email":"ann@example.com"}"#
    );
    assert_eq!(
        gson.to_json_with(&value, guest.clone()).unwrap(),
        r#"{"name":"ann"}"#
    );

    let json = r#"{"name":"bob","email":"bob@example.com"}"#;
    let read = gson.from_json_with(json, "Contact", guest).unwrap();
    assert_eq!(get(&read, "name"), Value::from("bob"));
    assert_eq!(get(&read, "email"), Value::from("ann@example.com"));
}

// -----------------------------------------------------------------------------
// Classes and instances

#[test]
fn virtual_wrapper() {
    let envelope = ClassDef::builder("Envelope")
        .directive(Directive::VirtualProperty(Some(String::from("data"))))
        .property(PropertyDef::new("id").typed("int"))
        .build();
    let gson = gson([envelope]);

    let value = gson.from_json(r#"{"data":{"id":2}}"#, "Envelope").unwrap();
    assert_eq!(get(&value, "id"), Value::Int(2));
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"data":{"id":2}}"#);

    let value = gson.from_json(r#"{"id":2}"#, "Envelope").unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn virtual_methods_are_written_only() {
    let user = ClassDef::builder("User")
        .property(PropertyDef::new("first").typed("string"))
        .property(PropertyDef::new("last").typed("string"))
        .method(
            MethodDef::new("fullName", |instance, _| {
                let part = |name: &str| instance.get(name).and_then(Value::as_str).unwrap_or("").to_owned();
                Ok(Value::from(format!("{} {}", part("first"), part("last"))))
            })
            .arity(0)
            .directive(Directive::VirtualProperty(None)),
        )
        .build();
    let gson = gson([user]);

    let json = r#"{"first":"Ann","last":"Lee","full_name":"ignored"}"#;
    let value = gson.from_json(json, "User").unwrap();
    assert_eq!(
        gson.to_json(&value).unwrap(),
        r#"{"first":"Ann","last":"Lee","full_name":"Ann Lee"}"#
    );
}

#[test]
fn accessor_methods_are_preferred() {
    let counter = ClassDef::builder("Counter")
        .property(PropertyDef::new("count").typed("int").private())
        .method(MethodDef::getter("getCount", "count"))
        .method(
            MethodDef::new("setCount", |instance, args| {
                let count = args[0].as_int().unwrap_or(0);
                instance.set("count", Value::Int(count * 10))?;
                Ok(Value::Null)
            })
            .arity(1),
        )
        .seal()
        .build();
    let gson = gson([counter]);

    let value = gson.from_json(r#"{"count":4}"#, "Counter").unwrap();
    assert_eq!(gson.to_json(&value).unwrap(), r#"{"count":40}"#);
}

#[test]
fn instance_creators_build_abstract_classes() {
    let err = gson(shapes()).from_json("{}", "Shape").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let [shape, circle] = shapes();
    let creator = circle.clone();
    let gson = builder([shape, circle])
        .add_instance_creator("Shape", move |_: &TypeDescriptor| -> Result<ObjectRef> {
            Ok(creator.new_object()?)
        })
        .build()
        .unwrap();

    let value = gson.from_json(r#"{"name":"c","radius":7}"#, "Shape").unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.class().name(), "Circle");
    assert_eq!(get(&value, "name"), Value::from("c"));
    // `radius` is not a `Shape` property.
    assert_eq!(get(&value, "radius"), Value::Int(1));

    assert_eq!(gson.to_json(&value).unwrap(), r#"{"radius":1,"name":"c"}"#);
}

#[test]
fn runtime_type_drives_writing() {
    let gson = gson(shapes());
    let circle = gson.loader().get("Circle").unwrap().new_object().unwrap();
    circle.write().set("name", Value::from("c")).unwrap();

    let list = Value::List(vec![Value::Object(circle)]);
    assert_eq!(gson.to_json(&list).unwrap(), r#"[{"radius":1,"name":"c"}]"#);

    let adapter = gson
        .provider()
        .get_adapter(&TypeDescriptor::parse("list<Shape>").unwrap())
        .unwrap();
    let json = adapter
        .write(&list, &mut vc_json::context::WriterContext::new(
            gson.provider(),
            gson.excluder(),
            gson.options(),
            Attributes::new(),
        ))
        .unwrap();
    assert_eq!(json, json!([{"radius": 1, "name": "c"}]));
}

#[test]
fn reading_into_existing_objects() {
    let settings = ClassDef::builder("Settings")
        .property(PropertyDef::new("theme").typed("string"))
        .property(PropertyDef::new("volume").typed("int"))
        .build();
    let profile = ClassDef::builder("Profile")
        .property(PropertyDef::new("name").typed("string"))
        .property(PropertyDef::new("settings").typed("Settings"))
        .build();
    let gson = gson([settings, profile]);

    let existing = gson
        .from_json(
            r#"{"name":"ann","settings":{"theme":"dark","volume":3}}"#,
            "Profile",
        )
        .unwrap();
    let object = existing.as_object().unwrap();
    let nested = get(&existing, "settings");

    let merged = gson
        .from_json_into(r#"{"settings":{"volume":7}}"#, object)
        .unwrap();
    assert!(merged.ptr_eq(object));

    let settings = get(&existing, "settings");
    assert!(settings.as_object().unwrap().ptr_eq(nested.as_object().unwrap()));
    assert_eq!(get(&settings, "theme"), Value::from("dark"));
    assert_eq!(get(&settings, "volume"), Value::Int(7));
    assert_eq!(get(&existing, "name"), Value::from("ann"));
}

// -----------------------------------------------------------------------------
// Caching

#[test]
fn adapters_and_metadata_are_memoized() {
    let gson = gson([sample()]);
    let ty = TypeDescriptor::class("Sample");

    let a = gson.provider().get_adapter(&ty).unwrap();
    let b = gson.provider().get_adapter(&ty).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let a = gson.class_metadata(&ty).unwrap();
    let b = gson.class_metadata(&ty).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn directive_cache_needs_a_directory() {
    let err = builder([sample()]).enable_cache(true).build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let dir = std::env::temp_dir().join(format!("vc_json_cache_{}", std::process::id()));
    let build = || {
        builder([sample()])
            .enable_cache(true)
            .set_cache_dir(dir.clone())
            .set_cache_namespace("tests")
            .build()
            .unwrap()
    };

    let json = r#"{"integer":5,"name":"a"}"#;
    let first = build();
    let value = first.from_json(json, "Sample").unwrap();
    assert_eq!(first.to_json(&value).unwrap(), json);
    assert!(dir.join("tests").read_dir().unwrap().next().is_some());

    // A fresh instance reads the directives back from disk.
    let second = build();
    let value = second.from_json(json, "Sample").unwrap();
    assert_eq!(second.to_json(&value).unwrap(), json);

    let _ = std::fs::remove_dir_all(&dir);
}
