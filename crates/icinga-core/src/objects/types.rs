//! Icinga 2 object types and their URL segments

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

macro_rules! object_types {
    ($($variant:ident => $segment:literal),+ $(,)?) => {
        /// Config object types exposed under `/v1/objects`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ObjectType {
            $($variant),+
        }

        impl ObjectType {
            pub const ALL: &'static [ObjectType] = &[$(ObjectType::$variant),+];

            /// Type name as Icinga 2 spells it (`Host`, `ServiceGroup`, ...)
            pub fn name(self) -> &'static str {
                match self {
                    $(ObjectType::$variant => stringify!($variant)),+
                }
            }

            /// Plural path segment (`hosts`, `servicegroups`, ...)
            pub fn url_segment(self) -> &'static str {
                match self {
                    $(ObjectType::$variant => $segment),+
                }
            }
        }
    };
}

object_types! {
    ApiListener => "apilisteners",
    ApiUser => "apiusers",
    CheckCommand => "checkcommands",
    Arguments => "argumentss",
    CheckerComponent => "checkercomponents",
    CheckResultReader => "checkresultreaders",
    Comment => "comments",
    CompatLogger => "compatloggers",
    Dependency => "dependencys",
    Downtime => "downtimes",
    Endpoint => "endpoints",
    EventCommand => "eventcommands",
    ExternalCommandListener => "externalcommandlisteners",
    FileLogger => "fileloggers",
    GelfWriter => "gelfwriters",
    GraphiteWriter => "graphitewriters",
    Host => "hosts",
    HostGroup => "hostgroups",
    IcingaApplication => "icingaapplications",
    IdoMySqlConnection => "idomysqlconnections",
    IdoPgSqlConnection => "idopgsqlconnections",
    LiveStatusListener => "livestatuslisteners",
    Notification => "notifications",
    NotificationCommand => "notificationcommands",
    NotificationComponent => "notificationcomponents",
    OpenTsdbWriter => "opentsdbwriters",
    PerfdataWriter => "perfdatawriters",
    ScheduledDowntime => "scheduleddowntimes",
    Service => "services",
    ServiceGroup => "servicegroups",
    StatusDataWriter => "statusdatawriters",
    SyslogLogger => "syslogloggers",
    TimePeriod => "timeperiods",
    User => "users",
    UserGroup => "usergroups",
    Zone => "zones",
}

impl FromStr for ObjectType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ApiError::UnknownObjectType(s.to_string()))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
