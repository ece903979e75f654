use chrono::{NaiveDate, NaiveDateTime};
use jsonbind_core::{
    get_element_raw_value, get_element_value, json_enum, json_object, to_list, to_obj, JsonError,
    JsonObject, TypeBuilder,
};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SampleEnum {
    Value1,
    Value2,
}

json_enum!(SampleEnum { Value1, Value2 });

struct BoolPair {
    value1: bool,
    value2: bool,
}

impl JsonObject for BoolPair {
    fn allocate() -> Self {
        BoolPair {
            value1: false,
            value2: false,
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value1", |o| &o.value1, |o| &mut o.value1)
            .public("Value2", |o| &o.value2, |o| &mut o.value2)
    }
}

#[derive(Debug)]
struct StringValue {
    value: String,
}

impl JsonObject for StringValue {
    fn allocate() -> Self {
        StringValue {
            value: String::new(),
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value", |o| &o.value, |o| &mut o.value)
    }
}

#[derive(Debug)]
struct IntPair {
    value1: i32,
    value2: Option<i32>,
}

impl JsonObject for IntPair {
    fn allocate() -> Self {
        IntPair {
            value1: 0,
            value2: None,
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value1", |o| &o.value1, |o| &mut o.value1)
            .public("Value2", |o| &o.value2, |o| &mut o.value2)
    }
}

#[allow(non_snake_case)]
struct NumericTypes {
    intValue: i32,
    longValue: i64,
    floatValue: f32,
    dblValue: f64,
}

impl JsonObject for NumericTypes {
    fn allocate() -> Self {
        NumericTypes {
            intValue: 0,
            longValue: 0,
            floatValue: 0.0,
            dblValue: 0.0,
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("intValue", |o| &o.intValue, |o| &mut o.intValue)
            .public("longValue", |o| &o.longValue, |o| &mut o.longValue)
            .public("floatValue", |o| &o.floatValue, |o| &mut o.floatValue)
            .public("dblValue", |o| &o.dblValue, |o| &mut o.dblValue)
    }
}

struct DateTimeValue {
    value: Option<NaiveDateTime>,
}

impl JsonObject for DateTimeValue {
    fn allocate() -> Self {
        DateTimeValue { value: None }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value", |o| &o.value, |o| &mut o.value)
    }
}

struct SubObject {
    value: Option<IntPair>,
}

impl JsonObject for SubObject {
    fn allocate() -> Self {
        SubObject { value: None }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value", |o| &o.value, |o| &mut o.value)
    }
}

struct Collections {
    list: Vec<String>,
    nested: Vec<Vec<Vec<Vec<i32>>>>,
    boxed: Box<[String]>,
    fixed: [i32; 3],
    signed_bytes: Vec<i8>,
    longs: Vec<i64>,
    doubles: Vec<f64>,
    blob: Vec<u8>,
}

impl JsonObject for Collections {
    fn allocate() -> Self {
        Collections {
            list: vec!["untouched".to_string()],
            nested: Vec::new(),
            boxed: Box::new([]),
            fixed: [0; 3],
            signed_bytes: Vec::new(),
            longs: Vec::new(),
            doubles: Vec::new(),
            blob: Vec::new(),
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("List", |o| &o.list, |o| &mut o.list)
            .public("Nested", |o| &o.nested, |o| &mut o.nested)
            .public("Boxed", |o| &o.boxed, |o| &mut o.boxed)
            .public("Fixed", |o| &o.fixed, |o| &mut o.fixed)
            .public("SignedBytes", |o| &o.signed_bytes, |o| &mut o.signed_bytes)
            .public("Longs", |o| &o.longs, |o| &mut o.longs)
            .public("Doubles", |o| &o.doubles, |o| &mut o.doubles)
            .public("Blob", |o| &o.blob, |o| &mut o.blob)
    }
}

struct Maps {
    names: HashMap<String, i32>,
    ordered: BTreeMap<i32, String>,
}

impl JsonObject for Maps {
    fn allocate() -> Self {
        Maps {
            names: HashMap::new(),
            ordered: BTreeMap::new(),
        }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Names", |o| &o.names, |o| &mut o.names)
            .public("Ordered", |o| &o.ordered, |o| &mut o.ordered)
    }
}

struct EnumValue {
    value: Option<SampleEnum>,
}

impl JsonObject for EnumValue {
    fn allocate() -> Self {
        EnumValue { value: None }
    }

    fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
        ty.public("Value", |o| &o.value, |o| &mut o.value)
    }
}

mod sealed {
    use jsonbind_core::{JsonObject, TypeBuilder};

    /// No setter and no constructor outside this module.
    pub struct Immutable {
        value: String,
    }

    impl Immutable {
        pub fn value(&self) -> &str {
            &self.value
        }
    }

    impl JsonObject for Immutable {
        fn allocate() -> Self {
            Immutable {
                value: "Original".to_string(),
            }
        }

        fn describe(ty: TypeBuilder<Self>) -> TypeBuilder<Self> {
            ty.private("Value", |o| &o.value, |o| &mut o.value)
        }
    }
}

use sealed::Immutable;

json_object!(
    BoolPair,
    StringValue,
    IntPair,
    NumericTypes,
    DateTimeValue,
    SubObject,
    Collections,
    Maps,
    EnumValue,
    Immutable,
);

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_booleans() {
    let obj: BoolPair = to_obj(r#"{ "Value1": true, "Value2": false }"#).unwrap();
    assert!(obj.value1);
    assert!(!obj.value2);
}

#[test]
fn decode_string() {
    let obj: StringValue = to_obj(r#"{ "Value": "SampleName" }"#).unwrap();
    assert_eq!(obj.value, "SampleName");
}

#[test]
fn decode_string_is_trimmed_inside_quotes() {
    let obj: StringValue = to_obj(r#"{ "Value": "  padded  " }"#).unwrap();
    assert_eq!(obj.value, "padded");
}

#[test]
fn decode_bare_word_as_text() {
    let obj: StringValue = to_obj(r#"{ "Value": SampleName }"#).unwrap();
    assert_eq!(obj.value, "SampleName");
}

#[test]
fn decode_number_into_string_keeps_spelling() {
    let obj: StringValue = to_obj(r#"{ "Value": 4.50 }"#).unwrap();
    assert_eq!(obj.value, "4.50");
}

#[test]
fn decode_object_into_string_reencodes() {
    let obj: StringValue = to_obj(r#"{ "Value": {"a":1,"b":[ 2 ]} }"#).unwrap();
    assert_eq!(obj.value, r#"{ "a": 1, "b": [ 2 ] }"#);
}

#[test]
fn decode_array_into_string_reencodes() {
    let obj: StringValue = to_obj(r#"{ "Value": [1,"two",[ ]] }"#).unwrap();
    assert_eq!(obj.value, r#"[ 1, "two", [ ] ]"#);
}

#[test]
fn decode_integers() {
    let obj: IntPair = to_obj(r#"{ "Value1": 79, "Value2": 12 }"#).unwrap();
    assert_eq!(obj.value1, 79);
    assert_eq!(obj.value2, Some(12));
}

#[test]
fn decode_floats_and_doubles() {
    let obj: NumericTypes =
        to_obj(r#"{ "floatValue": 1.23, "dblValue": 4.12345 }"#).unwrap();
    assert!((obj.floatValue - 1.23).abs() < 0.01);
    assert!((obj.dblValue - 4.12345).abs() < 0.01);
}

#[test]
fn decode_quoted_numbers_into_numeric_fields() {
    let obj: NumericTypes = to_obj(
        r#"{ "intValue": "79", "longValue": "412345678", "floatValue": "20.16", "dblValue": "12.23" }"#,
    )
    .unwrap();
    assert_eq!(obj.intValue, 79);
    assert_eq!(obj.longValue, 412_345_678);
    assert!((obj.floatValue - 20.16).abs() < 0.01);
    assert!((obj.dblValue - 12.23).abs() < 0.01);
}

#[test]
fn decode_quoted_boolean() {
    let obj: BoolPair = to_obj(r#"{ "Value1": "true", "Value2": "false" }"#).unwrap();
    assert!(obj.value1);
    assert!(!obj.value2);
}

#[test]
fn decode_date_time_without_seconds() {
    let obj: DateTimeValue = to_obj(r#"{ "Value": "2016-07-18T02:00" }"#).unwrap();
    let expected = NaiveDate::from_ymd_opt(2016, 7, 18)
        .unwrap()
        .and_hms_opt(2, 0, 0)
        .unwrap();
    assert_eq!(obj.value, Some(expected));
}

#[test]
fn decode_date_time_with_fraction() {
    let obj: DateTimeValue = to_obj(r#"{ "Value": "2020-02-29T23:59:58.250" }"#).unwrap();
    let expected = NaiveDate::from_ymd_opt(2020, 2, 29)
        .unwrap()
        .and_hms_milli_opt(23, 59, 58, 250)
        .unwrap();
    assert_eq!(obj.value, Some(expected));
}

#[test]
fn decode_root_scalars() {
    assert_eq!(to_obj::<i64>("-7"), Ok(-7));
    assert_eq!(to_obj::<bool>(" true "), Ok(true));
    assert_eq!(to_obj::<String>(r#""John Doe""#), Ok("John Doe".to_string()));
    assert_eq!(to_obj::<Option<i32>>("null"), Ok(None));
    assert_eq!(to_obj::<char>(r#""x""#), Ok('x'));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn decode_enum_member() {
    let obj: EnumValue = to_obj(r#"{ "Value": "Value2" }"#).unwrap();
    assert_eq!(obj.value, Some(SampleEnum::Value2));
}

#[test]
fn decode_enum_member_is_case_sensitive() {
    let err = to_obj::<SampleEnum>(r#""value2""#).unwrap_err();
    assert!(
        matches!(err, JsonError::Name { ref name, .. } if name == "value2"),
        "unexpected error: {err}"
    );
}

#[test]
fn decode_unknown_enum_member_leaves_field_unset() {
    let obj: EnumValue = to_obj(r#"{ "Value": "Value3" }"#).unwrap();
    assert_eq!(obj.value, None);
}

// ============================================================================
// Nested objects
// ============================================================================

#[test]
fn decode_nested_object() {
    let obj: SubObject = to_obj(r#"{ "Value": { "Value1": 1, "Value2": 3 } }"#).unwrap();
    let inner = obj.value.unwrap();
    assert_eq!(inner.value1, 1);
    assert_eq!(inner.value2, Some(3));
}

#[test]
fn decode_nested_object_with_no_matching_fields_leaves_field_unset() {
    let obj: SubObject = to_obj(r#"{ "Value": { "Other": 1 } }"#).unwrap();
    assert!(obj.value.is_none());
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn decode_empty_list() {
    let obj: Collections = to_obj(r#"{ "List": [] }"#).unwrap();
    assert!(obj.list.is_empty());
}

#[test]
fn decode_list_of_strings() {
    let obj: Collections = to_obj(r#"{ "List": [ "JC Denton", "Adam Jensen" ] }"#).unwrap();
    assert_eq!(obj.list, vec!["JC Denton", "Adam Jensen"]);
}

#[test]
fn decode_nested_list_of_integers() {
    let obj: Collections = to_obj(r#"{ "Nested": [ [ [ [ 9, 8, 7 ] ] ] ] }"#).unwrap();
    assert_eq!(obj.nested, vec![vec![vec![vec![9, 8, 7]]]]);
}

#[test]
fn decode_boxed_slice() {
    let obj: Collections = to_obj(r#"{ "Boxed": [ "Obi Wan Kenobi", "Yoda" ] }"#).unwrap();
    assert_eq!(obj.boxed.to_vec(), vec!["Obi Wan Kenobi", "Yoda"]);

    let empty: Collections = to_obj(r#"{ "Boxed": [] }"#).unwrap();
    assert!(empty.boxed.is_empty());
}

#[test]
fn decode_fixed_array() {
    let obj: Collections = to_obj(r#"{ "Fixed": [ 3, 1, 4 ] }"#).unwrap();
    assert_eq!(obj.fixed, [3, 1, 4]);
}

#[test]
fn decode_fixed_array_of_wrong_length_fails() {
    let err = to_obj::<[i32; 3]>("[ 3, 1, 4, 2, 5 ]").unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");
}

#[test]
fn decode_numeric_sequences() {
    let obj: Collections = to_obj(
        r#"{ "SignedBytes": [ 0, -128, 127, 5 ], "Longs": [ 123451234512345, 234562345623456 ], "Doubles": [ 5.4321, 6.789 ] }"#,
    )
    .unwrap();
    assert_eq!(obj.signed_bytes, vec![0, -128, 127, 5]);
    assert_eq!(obj.longs, vec![123_451_234_512_345, 234_562_345_623_456]);
    assert_eq!(obj.doubles, vec![5.4321, 6.789]);
}

#[test]
fn decode_base64_bytes() {
    let obj: Collections = to_obj(r#"{ "Blob": "AQID" }"#).unwrap();
    assert_eq!(obj.blob, vec![1, 2, 3]);
}

#[test]
fn decode_bytes_from_number_array() {
    let obj: Collections = to_obj(r#"{ "Blob": [ 1, 2, 255 ] }"#).unwrap();
    assert_eq!(obj.blob, vec![1, 2, 255]);
}

#[test]
fn decode_invalid_base64_is_a_parse_error() {
    let err = to_obj::<Vec<u8>>(r#""not base64!""#).unwrap_err();
    assert!(matches!(err, JsonError::Parse { .. }), "unexpected error: {err}");
}

#[test]
fn decode_list_element_failure_propagates() {
    let err = to_list::<i32>(r#"[ 1, "two", 3 ]"#).unwrap_err();
    assert_eq!(
        err,
        JsonError::Parse {
            kind: "i32",
            literal: "two".to_string()
        }
    );
}

#[test]
fn decode_root_list() {
    assert_eq!(to_list::<i32>("[ 1, 2, 3 ]"), Ok(vec![1, 2, 3]));
    assert_eq!(to_list::<String>("[ ]"), Ok(Vec::new()));
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn decode_map_from_single_entry_objects() {
    let obj: Maps = to_obj(r#"{ "Names": [ { "Adam": 1 }, { "Eve": 2 } ] }"#).unwrap();
    assert_eq!(obj.names.len(), 2);
    assert_eq!(obj.names["Adam"], 1);
    assert_eq!(obj.names["Eve"], 2);
}

#[test]
fn decode_map_with_numeric_keys() {
    let obj: Maps = to_obj(r#"{ "Ordered": [ { "2": "two" }, { "1": "one" } ] }"#).unwrap();
    assert_eq!(
        obj.ordered.into_iter().collect::<Vec<_>>(),
        vec![(1, "one".to_string()), (2, "two".to_string())]
    );
}

#[test]
fn decode_map_entry_with_two_keys_fails() {
    let err = to_obj::<HashMap<String, i32>>(r#"[ { "a": 1, "b": 2 } ]"#).unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");
}

#[test]
fn decode_native_object_is_not_a_map() {
    let err = to_obj::<HashMap<String, i32>>(r#"{ "a": 1 }"#).unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");
}

// ============================================================================
// Object binding rules
// ============================================================================

#[test]
fn decode_case_mismatched_key_never_binds() {
    let err = to_obj::<StringValue>(r#"{ "value": "SampleValue" }"#).unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");

    let obj: StringValue = to_obj(r#"{ "value": "SampleValue", "Value": "Kept" }"#).unwrap();
    assert_eq!(obj.value, "Kept");
}

#[test]
fn decode_bare_key_binds_by_exact_name() {
    let obj: IntPair = to_obj("{ Value1: 3, value2: 4 }").unwrap();
    assert_eq!(obj.value1, 3);
    assert_eq!(obj.value2, None);
}

#[test]
fn decode_empty_object_fails() {
    let err = to_obj::<StringValue>("{ }").unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");
}

#[test]
fn decode_blank_text_fails() {
    for text in ["", "   "] {
        let err = to_obj::<IntPair>(text).unwrap_err();
        assert!(matches!(err, JsonError::InvalidInput(_)), "unexpected error: {err}");
    }
}

#[test]
fn decode_unknown_keys_are_ignored() {
    let obj: IntPair = to_obj(r#"{ "Extra": [1, 2], "Value1": 5 }"#).unwrap();
    assert_eq!(obj.value1, 5);
    assert_eq!(obj.value2, None);
}

#[test]
fn decode_field_parse_failure_is_swallowed() {
    let obj: IntPair = to_obj(r#"{ "Value1": "abc", "Value2": 12 }"#).unwrap();
    assert_eq!(obj.value1, 0);
    assert_eq!(obj.value2, Some(12));
}

#[test]
fn decode_null_leaves_non_optional_field_allocated() {
    let obj: IntPair = to_obj(r#"{ "Value1": null, "Value2": null }"#).unwrap();
    assert_eq!(obj.value1, 0);
    assert_eq!(obj.value2, None);
}

#[test]
fn decode_later_duplicate_key_wins() {
    let obj: StringValue = to_obj(r#"{ "Value": "first", "Value": "second" }"#).unwrap();
    assert_eq!(obj.value, "second");
}

#[test]
fn decode_into_type_without_public_mutators() {
    let obj: Immutable = to_obj(r#"{ "Value": "New" }"#).unwrap();
    assert_eq!(obj.value(), "New");
}

#[test]
fn decode_object_from_array_fails() {
    let err = to_obj::<IntPair>("[ 1, 2 ]").unwrap_err();
    assert!(matches!(err, JsonError::Structural(_)), "unexpected error: {err}");
}

// ============================================================================
// Element lookup
// ============================================================================

const PRICED: &str = r#"{ "Data1": "Something Useless", "Price": 2.57 }"#;

#[test]
fn element_value_decodes_one_key() {
    let price: f64 = get_element_value("Price", PRICED).unwrap();
    assert!((price - 2.57).abs() < 0.01);

    let data: String = get_element_value("Data1", PRICED).unwrap();
    assert_eq!(data, "Something Useless");
}

#[test]
fn element_value_missing_key_is_null() {
    assert_eq!(get_element_value::<Option<f64>>("Missing", PRICED), Ok(None));
    assert!(matches!(
        get_element_value::<f64>("Missing", PRICED),
        Err(JsonError::Parse { .. })
    ));
}

#[test]
fn element_raw_value_is_undecoded() {
    assert_eq!(get_element_raw_value("Price", PRICED), Ok(Some("2.57")));
    assert_eq!(
        get_element_raw_value("Data1", PRICED),
        Ok(Some(r#""Something Useless""#))
    );
    assert_eq!(get_element_raw_value("price", PRICED), Ok(None));
}

#[test]
fn element_raw_value_keeps_nested_text() {
    let text = r#"{ "Inner": { "a": [1, 2] }, "n": 1 }"#;
    assert_eq!(
        get_element_raw_value("Inner", text),
        Ok(Some(r#"{ "a": [1, 2] }"#))
    );
}

#[test]
fn element_lookup_requires_an_object() {
    let err = get_element_raw_value("a", "[ 1 ]").unwrap_err();
    assert!(matches!(err, JsonError::InvalidInput(_)), "unexpected error: {err}");
}
