//! Built-in NSE sector classification.
//!
//! Broad trading categories covering the futures & options universe. A symbol
//! belongs to at most one sector; when building a lookup the first sector in
//! [`NseSector::all`] order that lists a symbol wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad NSE sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NseSector {
    /// Banks
    Banking,

    /// NBFCs, insurers, asset managers
    Finance,

    /// IT services
    It,

    /// Oil, gas and power
    Energy,

    /// Automobiles and components
    Auto,

    /// Fast-moving consumer goods
    Fmcg,

    /// Pharmaceuticals and hospitals
    Pharma,

    /// Metals, mining and cement
    Metal,

    /// Chemicals
    Chemicals,

    /// Capital goods
    Industrials,

    /// Defence
    Defence,

    /// Infrastructure and construction
    Infra,

    /// Consumer durables and discretionary
    Consumer,

    /// Index futures
    Index,

    /// Telecom
    Telecom,

    /// Real estate
    Realty,

    /// Exchanges and depositories
    MarketInfra,

    /// Transport and logistics
    Transport,

    /// Internet platforms and retail
    Internet,
}

impl NseSector {
    /// Returns all sectors in lookup priority order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Banking,
            Self::Finance,
            Self::It,
            Self::Energy,
            Self::Auto,
            Self::Fmcg,
            Self::Pharma,
            Self::Metal,
            Self::Chemicals,
            Self::Industrials,
            Self::Defence,
            Self::Infra,
            Self::Consumer,
            Self::Index,
            Self::Telecom,
            Self::Realty,
            Self::MarketInfra,
            Self::Transport,
            Self::Internet,
        ]
    }

    /// Returns the sector name as printed in reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Banking => "BANKING",
            Self::Finance => "FINANCE",
            Self::It => "IT",
            Self::Energy => "ENERGY",
            Self::Auto => "AUTO",
            Self::Fmcg => "FMCG",
            Self::Pharma => "PHARMA",
            Self::Metal => "METAL",
            Self::Chemicals => "CHEMICALS",
            Self::Industrials => "INDUSTRIALS",
            Self::Defence => "DEFENCE",
            Self::Infra => "INFRA",
            Self::Consumer => "CONSUMER",
            Self::Index => "INDEX",
            Self::Telecom => "TELECOM",
            Self::Realty => "REALTY",
            Self::MarketInfra => "MARKET INFRA",
            Self::Transport => "TRANSPORT",
            Self::Internet => "INTERNET",
        }
    }

    /// Parse a sector from its report name, ignoring case and surrounding space.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_uppercase();
        Self::all().into_iter().find(|s| s.name() == name)
    }

    /// Member symbols.
    pub const fn symbols(&self) -> &'static [&'static str] {
        match self {
            Self::Banking => BANKING,
            Self::Finance => FINANCE,
            Self::It => IT,
            Self::Energy => ENERGY,
            Self::Auto => AUTO,
            Self::Fmcg => FMCG,
            Self::Pharma => PHARMA,
            Self::Metal => METAL,
            Self::Chemicals => CHEMICALS,
            Self::Industrials => INDUSTRIALS,
            Self::Defence => DEFENCE,
            Self::Infra => INFRA,
            Self::Consumer => CONSUMER,
            Self::Index => INDEX,
            Self::Telecom => TELECOM,
            Self::Realty => REALTY,
            Self::MarketInfra => MARKET_INFRA,
            Self::Transport => TRANSPORT,
            Self::Internet => INTERNET,
        }
    }
}

impl fmt::Display for NseSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const BANKING: &[&str] = &[
    "HDFCBANK", "ICICIBANK", "AXISBANK", "SBIN", "KOTAKBANK", "BANKBARODA", "PNB", "IDFCFIRSTB",
    "FEDERALBNK", "YESBANK", "RBLBANK", "INDUSINDBK", "AUBANK", "BANDHANBNK", "CANBK",
    "UNIONBANK", "INDIANB", "BANKINDIA", "UCOBANK", "CENTRALBK", "MAHABANK", "CSBBANK",
    "DCBBANK", "SOUTHBANK", "IDBI", "KARURVYSYA", "TMB",
];

const FINANCE: &[&str] = &[
    "ABCAPITAL", "ANGELONE", "JIOFIN", "LICI", "PNBHOUSING", "BAJFINANCE", "BAJAJFINSV",
    "CHOLAFIN", "SHRIRAMFIN", "LTF", "LICHSGFIN", "MUTHOOTFIN", "MANAPPURAM", "PFC", "RECLTD",
    "IRFC", "IREDA", "IIFL", "KFINTECH", "MFSL", "SAMMAANCAP", "360ONE", "ICICIGI",
    "ICICIPRULI", "SBICARD", "SBILIFE", "HDFCAMC", "NUVAMA", "PAYTM", "POLICYBZR", "HDFCLIFE",
    "MAXHEALTH",
];

const IT: &[&str] = &[
    "TCS", "INFY", "HCLTECH", "WIPRO", "LTIM", "TECHM", "COFORGE", "MPHASIS", "KPITTECH",
    "PERSISTENT", "OFSS", "CYIENT", "SONATSOFTW", "ZENSARTECH", "BIRLASOFT", "DATAMATICS",
    "INTELLECT", "NEWGEN", "RATEGAIN", "QUESS", "TATAELXSI", "TATATECH",
];

const ENERGY: &[&str] = &[
    "RELIANCE", "ONGC", "BPCL", "IOC", "GAIL", "NTPC", "POWERGRID", "NHPC", "OIL", "ADANIPOWER",
    "ADANIGREEN", "ADANIENSOL", "TATAPOWER", "TORNTPOWER", "JSWENERGY", "SJVN", "NLCINDIA",
    "PETRONET", "CESC", "RPOWER", "INOXWIND", "SUZLON", "HINDPETRO", "POWERINDIA", "ADANIENT",
    "IEX",
];

const AUTO: &[&str] = &[
    "MARUTI", "M&M", "TATAMOTORS", "BAJAJ-AUTO", "HEROMOTOCO", "EICHERMOT", "TVSMOTOR",
    "ASHOKLEY", "UNOMINDA", "SONACOMS", "MOTHERSON", "ENDURANCE", "EXIDEIND", "BOSCHLTD",
    "BALKRISIND", "CEAT", "JKTYRE", "MRF", "TMPV",
];

const FMCG: &[&str] = &[
    "ITC", "HINDUNILVR", "NESTLEIND", "BRITANNIA", "DABUR", "GODREJCP", "MARICO", "VBL",
    "TATACONSUM", "COLPAL", "EMAMILTD", "PATANJALI", "RADICO", "UBL", "BIKAJI", "AWL", "VARUN",
    "KRBL", "LTFOODS", "ASIANPAINT", "ASTRAL", "UNITDSPR", "JUBLFOOD", "KALYANKJIL",
];

const PHARMA: &[&str] = &[
    "SUNPHARMA", "CIPLA", "DRREDDY", "DIVISLAB", "ALKEM", "AUROPHARMA", "LUPIN", "TORNTPHARM",
    "ZYDUSLIFE", "BIOCON", "GLENMARK", "LAURUSLABS", "NATCOPHARM", "IPCALAB", "AJANTPHARM",
    "JBPHARMA", "PFIZER", "SYNGENE", "APOLLOHOSP", "FORTIS", "MANKIND", "PPLPHARMA",
];

const METAL: &[&str] = &[
    "TATASTEEL", "JSWSTEEL", "HINDALCO", "NMDC", "COALINDIA", "VEDL", "SAIL", "NATIONALUM",
    "HINDZINC", "APLAPOLLO", "RATNAMANI", "JINDALSTEL", "MOIL", "IMFA", "GPIL", "ISGEC",
    "RAMCOIND", "AMBUJACEM", "DALBHARAT", "GRASIM", "SHREECEM", "ULTRACEMCO",
];

const CHEMICALS: &[&str] = &[
    "PIDILITIND", "SRF", "SOLARINDS", "UPL", "PIIND",
];

const INDUSTRIALS: &[&str] = &[
    "BHARATFORG", "CGPOWER", "KEI", "KAYNES", "SUPREMEIND", "TIINDIA", "PGEL",
];

const DEFENCE: &[&str] = &[
    "HAL", "BDL", "MAZDOCK", "BEL",
];

const INFRA: &[&str] = &[
    "LT", "ADANIPORTS", "SIEMENS", "BHEL", "ABB", "CUMMINSIND", "THERMAX", "KEC", "KNRCON",
    "IRCON", "RVNL", "NBCC", "RITES", "HUDCO", "GRINFRA", "ENGINERSIN", "GMRINFRA", "HGINFRA",
    "ASHOKA", "PNCINFRA", "CONCOR", "GMRAIRPORT",
];

const CONSUMER: &[&str] = &[
    "TITAN", "VOLTAS", "HAVELLS", "WHIRLPOOL", "BLUESTARCO", "CROMPTON", "DIXON", "AMBER",
    "KAJARIACER", "CERA", "VGUARD", "VIPIND", "BATAINDIA", "INDHOTEL", "INDIGO", "POLYCAB",
];

const INDEX: &[&str] = &[
    "NIFTY", "BANKNIFTY", "NIFTYNXT50", "MIDCPNIFTY",
];

const TELECOM: &[&str] = &[
    "BHARTIARTL", "IDEA", "VI", "TATACOMM", "INDUSTOWER",
];

const REALTY: &[&str] = &[
    "DLF", "LALPATHLAB", "OBEROIRLTY", "PRESTIGE", "MAHINDCIE", "SUNTECK", "CIPLAHOUSING",
    "LODHA", "PHOENIXLTD", "GODREJPROP", "BRIGADE", "SOBHA", "ANANTRAJ", "KOLTEPATIL",
    "MAHLIFE", "RUSTOMJEE",
];

const MARKET_INFRA: &[&str] = &[
    "NSE", "BSE", "MCX", "CDSL", "CAMS",
];

const TRANSPORT: &[&str] = &[
    "IRCTC", "DELHIVERY", "ALLCARGO", "GATI", "TCIEXP", "VRLLOG",
];

const INTERNET: &[&str] = &[
    "NYKAA", "NAUKRI", "TRENT", "DMART", "PAGEIND", "ETERNAL", "ZOMATO",
];
