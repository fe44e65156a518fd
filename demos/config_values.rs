//! Models configuration values that are each one of a closed set of shapes
//! with `Variant3`, dispatching on the live alternative.

use protean::Variant3;

type ConfigValue = Variant3<bool, i64, String>;

fn describe(name: &str, value: &ConfigValue) {
    // Positional probes mirror a match over the discriminant.
    if let Ok(flag) = value.alt_0() {
        println!("{name}: flag set to {flag}");
    } else if let Ok(number) = value.alt_1() {
        println!("{name}: number {number}");
    } else if let Ok(text) = value.alt_2() {
        println!("{name}: text {text:?}");
    }
}

fn main() {
    let mut settings: Vec<(&str, ConfigValue)> = vec![
        ("verbose", ConfigValue::try_new(true).unwrap()),
        ("retries", ConfigValue::try_new(3i64).unwrap()),
        (
            "endpoint",
            ConfigValue::try_new(String::from("localhost:8080")).unwrap(),
        ),
    ];

    for (name, value) in &settings {
        describe(name, value);
    }

    // Reassignment switches the live alternative and reports the new index.
    let (_, retries) = &mut settings[1];
    retries.try_set(String::from("unlimited")).unwrap();
    println!(
        "retries is now alternative {} ({})",
        retries.index(),
        retries.type_name()
    );

    // A value outside the closed set is handed back, not stored.
    let rejected = ConfigValue::try_new(2.5f32).unwrap_err();
    println!("rejected {rejected}: not one of the declared alternatives");
}
