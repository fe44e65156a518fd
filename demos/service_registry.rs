//! Stores unrelated service objects in one registry through `AnyValue`,
//! recovering each behind its concrete type on the way out.

use protean::AnyValue;

#[derive(Clone, Debug)]
struct HttpClient {
    base_url: String,
}

#[derive(Clone, Debug)]
struct Cache {
    capacity: usize,
}

fn main() {
    let mut registry: Vec<AnyValue> = Vec::new();

    registry.push(AnyValue::new(HttpClient {
        base_url: "https://api.example.com".to_owned(),
    }));
    registry.push(AnyValue::new(Cache { capacity: 512 }));
    registry.push(AnyValue::new(42i32));

    for entry in &registry {
        println!("slot holds a {}", entry.type_name());
    }

    // Pick services back out by their concrete type.
    let client = registry
        .iter()
        .find_map(|entry| entry.downcast_ref::<HttpClient>())
        .expect("an HttpClient was registered");
    println!("client targets {}", client.base_url);

    let cache = registry
        .iter()
        .find_map(|entry| entry.downcast_ref::<Cache>())
        .expect("a Cache was registered");
    println!("cache holds up to {} entries", cache.capacity);

    // The failure-signaling accessor explains a miss.
    let err = registry[2].get::<String>().unwrap_err();
    println!("lookup failed as expected: {err}");
}
