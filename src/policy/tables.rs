use super::{FieldRule, PolicyTable, Section};

const BUSINESS: Section = Section::BusinessData;
const POLICY: Section = Section::PolicyData;

pub static SAP_R3: PolicyTable = PolicyTable {
    discriminator: "sap r3",
    rules: &[
        FieldRule::copy("TransactionId", BUSINESS),
        FieldRule::copy("ReportName", BUSINESS),
        FieldRule::copy("DynproNumber", BUSINESS),
        FieldRule::copy("ServerName", POLICY),
        FieldRule::copy("TimeStamp", POLICY),
        FieldRule::copy("IpAddress", POLICY),
        FieldRule::copy("SapUser", POLICY),
        FieldRule::copy("TerminalId", POLICY),
        FieldRule::copy("ConnectionType", POLICY),
        FieldRule::always("UserName", POLICY),
    ],
};

pub static WSS: PolicyTable = PolicyTable {
    discriminator: "wss",
    rules: &[
        FieldRule::copy("businessServiceOrigin", BUSINESS),
        FieldRule::copy("itemLocation", BUSINESS),
        FieldRule::copy("userAction", POLICY),
        FieldRule::copy("userAgent", POLICY),
        FieldRule::copy("authentication", POLICY),
        FieldRule::copy("customAction", POLICY),
        FieldRule::copy("itemId", POLICY),
        FieldRule::copy("itemType", POLICY),
        FieldRule::copy("eventData", POLICY),
        FieldRule::copy("eventSource", POLICY),
        FieldRule::always("locationType", POLICY),
        FieldRule::copy("IpAddress", POLICY),
        FieldRule::always("machineName", POLICY),
        FieldRule::always("TimeStamp", POLICY),
        FieldRule::copy("siteId", POLICY),
        FieldRule::always("sourceName", POLICY),
        FieldRule::copy("UserName", POLICY),
        FieldRule::always("userDomain", POLICY),
        FieldRule::copy("wssUserId", POLICY),
        FieldRule::multi("wssGroups", POLICY),
    ],
};

pub static POLICY_TABLES: [&PolicyTable; 2] = [&SAP_R3, &WSS];
