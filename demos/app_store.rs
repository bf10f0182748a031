use querysift::{AppMeta, Maintainer, Record, RuleSet, Store, Version};

fn app(title: &str, version: Version) -> AppMeta {
    AppMeta {
        title: title.to_owned(),
        version,
        maintainers: vec![Maintainer {
            name: format!("maintainer {title}"),
            email: "maintainer@example.com".into(),
        }],
        company: "Random Inc.".into(),
        website: "https://website.com".into(),
        source: "https://github.com/random/repo".into(),
        license: "Apache-2.0".into(),
        description: "Some application content".into(),
    }
}

fn main() {
    let store = Store::new();
    for (title, version) in [
        ("App1", Version::new(0, 0, 1)),
        ("App1", Version::new(0, 2, 0)),
        ("App2", Version::new(1, 0, 0)),
    ] {
        let meta = app(title, version);
        meta.validate().expect("invalid app");
        store.add(meta).expect("duplicate app");
    }

    if let Err(err) = store.add(app("App1", Version::new(0, 0, 1))) {
        println!("Rejected: {err}");
    }

    // The shape of `?title[like]=App&version[gt]=0.1.0` once decoded.
    let rules = RuleSet::from_pairs(
        [("title[like]", "App"), ("version[gt]", "0.1.0")],
        AppMeta::schema(),
    )
    .expect("failed to parse query");
    println!("Query: {rules}");

    for meta in store.list(&rules).expect("filter failed") {
        println!("  {} ({})", meta.key(), meta.license);
    }

    if let Some(latest) = store.get_by_key_prefix("App1") {
        println!("Latest App1: {}", latest.version);
    }
}
