use model_factories::flat_pages::{self, FlatPageFactory};
use model_factories::{Attributes, ModelStore, Value, attrs};

fn flat_page_factory() -> FlatPageFactory {
    FlatPageFactory::new(&flat_pages::registry()).unwrap()
}

#[test]
fn test_build_flat_page() {
    let factory = flat_page_factory();
    let flat_page = factory.build_flat_page(attrs! {}).unwrap();

    assert_eq!(flat_page.model().label(), "flatpages.FlatPage");
    assert!(flat_page.pk().is_none(), "FlatPage is not saved.");
    assert_eq!(flat_page.text("url"), Some("/test/page/"));
    assert_eq!(flat_page.text("title"), Some("Test Page"));
    assert_eq!(flat_page.text("content"), Some("<h1>Test Page</h1>"));
    assert_eq!(flat_page.get("registration_required"), Some(&Value::Boolean(false)));
    assert_eq!(factory.store().count("flatpages.FlatPage").unwrap(), 0);
}

#[test]
fn test_create_flat_page() {
    let factory = flat_page_factory();
    let flat_page = factory.create_flat_page(attrs! {}).unwrap();

    assert!(flat_page.pk().is_some(), "FlatPage is saved.");
    assert_eq!(flat_page.text("url"), Some("/test/page/"));
    assert_eq!(flat_page.text("title"), Some("Test Page"));
    assert_eq!(flat_page.text("content"), Some("<h1>Test Page</h1>"));
    assert_eq!(flat_page.get("registration_required"), Some(&Value::Boolean(false)));

    let stored = factory
        .store()
        .fetch("flatpages.FlatPage", flat_page.pk().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(&stored, flat_page.fields());
}

#[test]
fn test_argument_overrides() {
    let factory = flat_page_factory();
    let flat_page = factory
        .build_flat_page(attrs! { "title" => "My Title", "content" => "Content" })
        .unwrap();

    assert_eq!(flat_page.text("url"), Some("/test/page/"));
    assert_eq!(flat_page.text("title"), Some("My Title"));
    assert_eq!(flat_page.text("content"), Some("Content"));
}

#[test]
fn test_interpolation() {
    let factory = flat_page_factory();
    let flat_page = factory.build_flat_page(attrs! { "title" => "My Title" }).unwrap();

    assert_eq!(flat_page.text("title"), Some("My Title"));
    assert_eq!(flat_page.text("content"), Some("<h1>My Title</h1>"));
}

#[test]
fn test_override_may_add_model_fields() {
    let factory = flat_page_factory();
    let flat_page = factory
        .build_flat_page(attrs! { "template_name" => "flatpages/%(title)s.html" })
        .unwrap();

    assert_eq!(flat_page.text("template_name"), Some("flatpages/Test Page.html"));
}

#[test]
fn test_protected_flat_page() {
    let factory = flat_page_factory();
    let flat_page = factory.build_protected_flat_page(attrs! {}).unwrap();

    assert!(flat_page.pk().is_none(), "FlatPage is not saved.");
    assert_eq!(flat_page.text("url"), Some("/test/page/"));
    assert_eq!(flat_page.text("title"), Some("Test Page"));
    assert_eq!(flat_page.text("content"), Some("<h1>Test Page</h1>"));
    assert_eq!(flat_page.get("registration_required"), Some(&Value::Boolean(true)));
}

#[test]
fn test_derived_blueprint_does_not_leak_into_base() {
    let factory = flat_page_factory();

    factory.build_protected_flat_page(attrs! {}).unwrap();
    let defaults = factory.flat_page().unwrap();
    assert_eq!(defaults.get("registration_required"), Some(&Value::Boolean(false)));

    let flat_page = factory.build_flat_page(attrs! {}).unwrap();
    assert_eq!(flat_page.get("registration_required"), Some(&Value::Boolean(false)));
}

#[test]
fn test_blueprint_docs_and_operations() {
    let factory = flat_page_factory();

    assert_eq!(factory.name(), "FlatPageFactory");
    assert_eq!(
        factory.blueprint("flat_page").unwrap().doc(),
        "Blueprint: A basic FlatPage--public, no comments."
    );

    let operations: Vec<&str> = factory.operations().map(|op| op.name()).collect();
    assert_eq!(
        operations,
        vec![
            "build_flat_page",
            "build_protected_flat_page",
            "create_flat_page",
            "create_protected_flat_page",
        ]
    );
    assert_eq!(
        factory.operation("create_protected_flat_page").unwrap().doc(),
        "Create and save an instance of the 'FlatPage' model based on the 'protected_flat_page' blueprint."
    );
}

#[test]
fn test_call_by_operation_name() {
    let factory = flat_page_factory();

    let built = factory.call("build_flat_page", Attributes::new()).unwrap();
    assert!(!built.is_saved());

    let created = factory
        .call("create_protected_flat_page", attrs! { "url" => "/members/" })
        .unwrap();
    assert!(created.is_saved());
    assert_eq!(created.text("url"), Some("/members/"));
    assert_eq!(factory.store().count("flatpages.FlatPage").unwrap(), 1);
}

#[test]
fn test_unknown_override_field_is_rejected() {
    let factory = flat_page_factory();
    let err = factory.build_flat_page(attrs! { "bogus" => 1 }).unwrap_err();
    assert!(err.to_string().contains("'bogus' is an invalid field"));
}

#[test]
fn test_missing_interpolation_key_fails_the_call() {
    let factory = flat_page_factory();
    let err = factory
        .build_flat_page(attrs! { "content" => "%(subtitle)s" })
        .unwrap_err();
    assert!(matches!(err, model_factories::FactoryError::MissingKey(key) if key == "subtitle"));
}
