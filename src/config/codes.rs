// src/config/codes.rs

/// Descriptive columns shared by both directories, in output order.
pub const BASE_COLUMNS: &[&str] = &[
    "name1",
    "name2",
    "street1",
    "street2",
    "city",
    "state",
    "zip",
    "phone",
    "intake1",
    "intake2",
    "intake1a",
    "intake2a",
    "service_code_info",
];

/// Service codes carried by the mental-health directory.
pub const MENTAL_HEALTH_CODES: &[&str] = &[
    "SA", "MH", "SUMH", "HI", "OP", "PHDT", "RES", "CMHC", "CBHC", "MSMH", "OMH", "ORES", "PH",
    "PSY", "RTCA", "RTCC", "IPSY", "SHP", "VAHC", "CHLOR", "DROPE", "FLUPH", "HALOP", "LOXAP",
    "PERPH", "PIMOZ", "PROCH", "THIOT", "THIOR", "TRIFL", "ARIPI", "ASENA", "BREXP", "CARIP",
    "CLOZA", "ILOPE", "LURAS", "OLANZ", "OLANZF", "PALIP", "QUETI", "RISPE", "ZIPRA", "NRT",
    "NSC", "ANTPYCH", "AT", "CBT", "CRT", "CFT", "DBT", "ECT", "EMDR", "GT", "IDD", "IPT", "KIT",
    "TMS", "TELE", "AIM", "CIT", "PEON", "PEOFF", "WI", "DDF", "LCCG", "IH", "PVTP", "PVTN",
    "STG", "TBG", "FED", "VAMC", "FQHC", "MHC", "CLF", "CMHG", "CSBG", "FG", "ITU", "MC", "MD",
    "MI", "OSF", "PI", "PCF", "SCJJ", "SEF", "SF", "SI", "SMHA", "SWFS", "VAF", "PA", "SS", "TAY",
    "SE", "GL", "VET", "ADM", "MF", "CJ", "CO", "HV", "DV", "TRMA", "TBI", "ALZ", "PED", "PEFP",
    "PTSD", "SED", "SMI", "STU", "HIVT", "STDT", "TBS", "MST", "HBT", "HCT", "LABT", "HS", "PEER",
    "TCC", "SMON", "SMOP", "SMPD", "CHLD", "YAD", "ADLT", "SNR", "SP", "AH", "NX", "FX", "ACT",
    "AOT", "CDM", "COOT", "DEC", "FPSY", "ICM", "IMR", "LAD", "PRS", "SEMP", "SH", "TPC", "VRS",
    "CM", "IPC", "SPS", "ES",
];

/// Service codes carried by the substance-abuse directory.
pub const SUBSTANCE_ABUSE_CODES: &[&str] = &[
    "DT", "HH", "HID", "HIT", "OD", "ODT", "OIT", "OMB", "ORT", "RD", "RL", "RS", "GH", "PSYH",
    "MU", "BU", "NU", "INPE", "RPE", "PC", "NAUT", "NMAUT", "ACMA", "PMAT", "AUINPE", "AURPE",
    "AUPC", "DB", "BUM", "OTP", "DM", "MM", "UB", "UN", "RPN", "PAIN", "MOA", "NMOA", "DLC",
    "NOOP", "MWS", "ACM", "DSF", "METH", "BSDM", "BWN", "BWON", "BERI", "NXN", "VTRL", "MHIV",
    "MHCV", "LFXD", "CLND", "MMD", "MPEP", "ANG", "BIA", "CMI", "CRV", "MOTI", "MXM", "RELP",
    "SACA", "TRC", "TWFA", "STAG", "STMH", "STDH", "CARF", "COA", "HFAP", "HLA", "JC", "NCQA",
    "SOTP", "DEA", "FSA", "NP", "SAMF", "AD", "WN", "PW", "MN", "COPSU", "XA", "CMHA", "CSAA",
    "ISC", "OPC", "MHPA", "SSA", "SMHD", "PIEC", "BABA", "DAOF", "DAUT", "ACC", "DP", "NOE", "OFD",
    "SHG", "AOSS", "RC", "EMP", "TGD", "TOD", "ADTX", "BDTX", "CDTX", "MDTX", "ODTX", "MDET",
    "HAEC", "TAEC", "HEOH", "SAE", "ICO", "GCO", "FCO", "MCO", "VOC", "HAV", "HBV", "FEM", "MALE",
    "DU", "DUO", "AUDO", "OUDO", "F4", "F17", "F19", "F25", "F28", "F30", "F31", "F35", "F36",
    "F37", "F42", "F43", "F47", "F66", "F67", "F70", "F81", "F92", "N24", "N40", "VAPN", "VAPP",
    "VPPD", "ACU", "BC", "CCC", "DVFP", "EIH", "MHS", "SSD", "TA",
];

pub(crate) fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
