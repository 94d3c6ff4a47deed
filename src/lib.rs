pub mod configuration;
pub mod configurationerror;
pub mod logging;

pub mod server {
    pub mod dispatcher;
    pub mod rpcmessage;
    pub mod tooldefinition;
    pub mod toolerror;
    pub mod toolrequest;
    pub mod toolresult;
    pub mod transport;
}

pub mod time {
    pub mod calendarerror;
    pub mod dateformat;
    pub mod instant;
    pub mod isoweek;
    pub mod period;
    pub mod rangeofdates;
    pub mod utility;

    pub mod calendar {
        pub mod dayentry;
        pub mod holidaycalendar;
        pub mod holidaydata;
        pub mod holidayfetcher;
        pub mod holidayregistry;
        pub mod registryerror;
        pub mod standardcalendar;
    }

    pub mod workday {
        pub mod policycalendar;
        pub mod workdayclassification;
        pub mod workdayclassifier;
        pub mod workdaypolicy;
        pub mod workdaystats;
    }
}
