use rapl_core::{
    error::InternalError,
    prelude::*,
    source::{Criteria, LoadRequest, SourceError, WireResponse, WireSource},
    types::{ScalarType, TypeError, TypeRegistry},
    value::{IdentityKey, WireValue},
};
use std::sync::{Arc, Mutex};

fn registry() -> MetadataRegistry {
    MetadataRegistry::new()
        .with(
            EntityMetadata::builder("Author")
                .scalar("id", "integer")
                .scalar("name", "string")
                .identifier(["id"])
                .build()
                .expect("author metadata should build"),
        )
        .and_then(|r| {
            r.with(
                EntityMetadata::builder("Book")
                    .scalar("id", "integer")
                    .scalar("title", "string")
                    .scalar_as("price", "priceCents", "cents")
                    .embed_one("author", "Author")
                    .identifier(["id"])
                    .build()
                    .expect("book metadata should build"),
            )
        })
        .expect("fixture metadata should register")
}

///
/// CentsType
///

struct CentsType;

impl ScalarType for CentsType {
    fn name(&self) -> &'static str {
        "cents"
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        match wire {
            WireValue::Null => Ok(Value::Null),
            WireValue::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .ok_or_else(|| TypeError::invalid("cents", wire)),
            _ => Err(TypeError::invalid("cents", wire)),
        }
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Int(i) => Ok(WireValue::from(*i)),
            other => Err(TypeError::unexpected("cents", other)),
        }
    }
}

fn session() -> Session {
    let mut types = TypeRegistry::with_builtins();
    types.register(CentsType).expect("cents should register");

    Session::new(Arc::new(registry())).types_registry(Arc::new(types))
}

///
/// StaticSource
///
/// Serves canned bodies by entity class and records every request.
///

#[derive(Default)]
struct StaticSource {
    routes: Vec<(&'static str, WireResponse)>,
    seen: Mutex<Vec<LoadRequest>>,
}

impl StaticSource {
    fn route(mut self, class: &'static str, response: WireResponse) -> Self {
        self.routes.push((class, response));
        self
    }
}

impl WireSource for StaticSource {
    fn fetch(&self, request: &LoadRequest) -> Result<WireResponse, InternalError> {
        self.seen
            .lock()
            .expect("request log lock")
            .push(request.clone());

        self.routes
            .iter()
            .find(|(class, _)| *class == request.class.as_str())
            .map(|(_, response)| response.clone())
            .ok_or_else(|| {
                SourceError::UnknownRoute {
                    class: request.class.to_string(),
                }
                .into()
            })
    }
}

#[test]
fn load_hydrates_enveloped_collection() {
    let source = StaticSource::default().route(
        "Book",
        WireResponse::collection(
            r#"{"data":{"books":[
                {"id":1,"title":"One","priceCents":1250,"author":{"id":9,"name":"Ann"}},
                {"id":2,"title":"Two","author":{"id":9,"name":"Ann"}}
            ]}}"#,
        )
        .envelope(["data", "books"]),
    );
    let session = session();

    let books = session
        .load(&source, &LoadRequest::all("Book").limit(2))
        .expect("books should load");

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].get("price"), Some(Value::Int(1250)));
    assert_eq!(books[1].get("price"), Some(Value::Null));

    let first_author = books[0].get("author").and_then(|v| v.as_entity().cloned());
    let second_author = books[1].get("author").and_then(|v| v.as_entity().cloned());
    assert_eq!(
        first_author, second_author,
        "both books embed the same author"
    );
    assert_eq!(session.identity_map().len(), 3);

    let seen = source.seen.lock().expect("request log lock");
    assert_eq!(seen[0].limit, Some(2));
    assert_eq!(seen[0].criteria, Criteria::All);
}

#[test]
fn load_one_reuses_tracked_instance() {
    let source = StaticSource::default().route(
        "Author",
        WireResponse::single(r#"{"id":9,"name":"Ann B."}"#),
    );
    let session = session();

    let books = session
        .hydrate(
            "Book",
            r#"{"id":1,"author":{"id":9,"name":"Ann"}}"#,
            false,
            &[],
        )
        .expect("book should hydrate");

    let author = session
        .load_one(
            &source,
            &LoadRequest::by_id("Author", [("id", WireValue::from(9))]),
        )
        .expect("author should load")
        .expect("author should be present");

    let embedded = books[0]
        .get("author")
        .and_then(|v| v.as_entity().cloned())
        .expect("embedded author");
    assert!(embedded.ptr_eq(&author));
    assert_eq!(embedded.get("name"), Some(Value::from("Ann B.")));
    assert!(
        session
            .identity_map()
            .contains(&IdentityKey::single("Author", 9i64))
    );
}

#[test]
fn load_one_of_empty_response_is_none() {
    let source = StaticSource::default().route(
        "Author",
        WireResponse::single(r#"{"author":null}"#).envelope(["author"]),
    );

    let found = session()
        .load_one(&source, &LoadRequest::all("Author"))
        .expect("empty envelope is not an error");

    assert!(found.is_none());
}

#[test]
fn source_errors_propagate() {
    let err = session()
        .load(&StaticSource::default(), &LoadRequest::all("Book"))
        .expect_err("unrouted class should fail");

    assert!(err.is_not_found());
}

#[test]
fn custom_type_rejects_bad_values() {
    let err = session()
        .hydrate("Book", r#"{"id":1,"priceCents":"12.50"}"#, false, &[])
        .expect_err("string cents should be rejected");

    assert!(err.is_invalid_value());
}

#[test]
fn entities_can_be_updated_through_the_handle() {
    let session = session();
    let authors = session
        .hydrate("Author", r#"{"id":3,"name":"Old"}"#, false, &[])
        .expect("author should hydrate");

    authors[0]
        .write()
        .set_value("name", Value::from("New"))
        .expect("known field should accept a value");

    let again = session
        .hydrate("Author", r#"{"id":3}"#, false, &[])
        .expect("author should hydrate");
    assert_eq!(again[0].get("name"), Some(Value::from("New")));

    let err = authors[0]
        .write()
        .set_value("nickname", Value::from("x"))
        .expect_err("unknown field should be rejected");
    assert!(err.message.contains("nickname"));
}

#[test]
fn shared_session_reconciles_across_threads() {
    let session = session();

    let handles: Vec<EntityRef> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let session = &session;
                scope.spawn(move || {
                    let body = format!(r#"{{"id":42,"name":"writer {i}"}}"#);
                    session
                        .hydrate("Author", body.as_str(), false, &[])
                        .expect("author should hydrate")
                        .remove(0)
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|w| w.join().expect("worker should not panic"))
            .collect()
    });

    assert!(handles.windows(2).all(|w| w[0].ptr_eq(&w[1])));
    assert_eq!(session.identity_map().len(), 1);
}
