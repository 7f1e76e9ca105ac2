use super::*;
use crate::payload::NodePath;

const SAP_HEADER: &str = "BAMType,BAMUniqueID,TransactionId,ReportName,DynproNumber,ServerName,\
TimeStamp,IpAddress,SapUser,TerminalId,ConnectionType,UserName";

fn event_document() -> Result<(Document, String), PayloadError> {
    let mut document = Document::new();
    document.add_node(None, "event", &[("eventId", "1")])?;
    let path = NodePath::keyed("event", "eventId", "1");
    document.add_node(Some(&path), Section::BusinessData.tag(), &[])?;
    document.add_node(Some(&path), Section::PolicyData.tag(), &[])?;
    Ok((document, path))
}

fn section_attr<'doc>(
    document: &'doc Document,
    path: &str,
    section: Section,
    name: &str,
) -> Result<Option<&'doc str>, PayloadError> {
    let node = document.select(&format!("{}/{}", path, section.tag()))?;
    Ok(document.attr(node, name))
}

#[test]
fn sap_r3_skips_empty_report_name_but_keeps_empty_user_name() -> Result<(), PayloadError> {
    let fields = FieldTable::parse("sap.csv", SAP_HEADER);
    let policy = BoundPolicy::bind(&SAP_R3, &fields)?;
    let record = Record::parse(1, "SAP R3,77,T-1,,D100,srv,2024-01-01,10.0.0.1,sapuser,term,rfc,");
    let (mut document, path) = event_document()?;

    policy.apply(&mut document, &path, &record)?;

    assert_eq!(
        section_attr(&document, &path, Section::BusinessData, "ReportName")?,
        None
    );
    assert_eq!(
        section_attr(&document, &path, Section::BusinessData, "TransactionId")?,
        Some("T-1")
    );
    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "UserName")?,
        Some("")
    );
    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "ConnectionType")?,
        Some("rfc")
    );
    Ok(())
}

#[test]
fn wss_copies_multi_valued_groups_and_keeps_empty_fields() -> Result<(), PayloadError> {
    let header: Vec<&str> = std::iter::once("BAMType")
        .chain(std::iter::once("BAMUniqueID"))
        .chain(WSS.rules.iter().map(|rule| rule.field))
        .collect();
    let fields = FieldTable::parse("wss.csv", &header.join(","));
    let policy = BoundPolicy::bind(&WSS, &fields)?;

    let mut values = vec!["wss".to_owned(), "5".to_owned()];
    for rule in WSS.rules {
        let value = match rule.field {
            "wssGroups" => "readers;writers",
            "itemId" => "42",
            _ => "",
        };
        values.push(value.to_owned());
    }
    let record = Record::parse(3, &values.join(","));
    let (mut document, path) = event_document()?;

    policy.apply(&mut document, &path, &record)?;

    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "wssGroups")?,
        Some("readers;writers")
    );
    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "itemId")?,
        Some("42")
    );
    // WSS drops an empty user name while keeping an empty machine name.
    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "UserName")?,
        None
    );
    assert_eq!(
        section_attr(&document, &path, Section::PolicyData, "machineName")?,
        Some("")
    );
    assert_eq!(
        section_attr(&document, &path, Section::BusinessData, "itemLocation")?,
        None
    );
    Ok(())
}

#[test]
fn lookup_matches_discriminator_case_insensitively() -> Result<(), PayloadError> {
    let fields = FieldTable::parse("sap.csv", SAP_HEADER);
    let set = PolicySet::bind(&POLICY_TABLES, &fields);

    let sap = set.lookup("SAP R3").ok_or("expected sap r3 policy")??;
    assert_eq!(sap.discriminator(), "sap r3");
    assert!(set.lookup("mainframe").is_none());

    match set.lookup("WSS") {
        Some(Err(RecordError::UnknownField { source_name, .. })) => {
            assert_eq!(source_name, "sap.csv");
            Ok(())
        }
        other => Err(format!("unexpected wss lookup: {:?}", other).into()),
    }
}

#[test]
fn short_record_is_a_unit_error() -> Result<(), PayloadError> {
    let fields = FieldTable::parse("sap.csv", SAP_HEADER);
    let policy = BoundPolicy::bind(&SAP_R3, &fields)?;
    let record = Record::parse(9, "sap r3,1,T");
    let (mut document, path) = event_document()?;

    match policy.apply(&mut document, &path, &record) {
        Err(PayloadError::MissingField { sequence, .. }) => {
            assert_eq!(sequence, 9);
            Ok(())
        }
        other => Err(format!("unexpected apply result: {:?}", other).into()),
    }
}
