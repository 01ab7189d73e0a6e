//! Property names as constants.

// Common
pub const TYPE: &str = jscal_core::constants::TYPE_KEY;
pub const UID: &str = "uid";
pub const PROD_ID: &str = "prodId";
pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const SEQUENCE: &str = "sequence";
pub const METHOD: &str = "method";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DESCRIPTION_CONTENT_TYPE: &str = "descriptionContentType";
pub const SHOW_WITHOUT_TIME: &str = "showWithoutTime";
pub const LOCALE: &str = "locale";
pub const KEYWORDS: &str = "keywords";
pub const CATEGORIES: &str = "categories";
pub const COLOR: &str = "color";
pub const COMMENTS: &str = "comments";
pub const PRIVACY: &str = "privacy";
pub const STATUS: &str = "status";
pub const FREE_BUSY_STATUS: &str = "freeBusyStatus";
pub const PRIORITY: &str = "priority";
pub const TIME_ZONE: &str = "timeZone";
pub const REPLY_TO: &str = "replyTo";
pub const RELATED_TO: &str = "relatedTo";
pub const USE_DEFAULT_ALERTS: &str = "useDefaultAlerts";

// Collections of nested objects
pub const LOCATIONS: &str = "locations";
pub const VIRTUAL_LOCATIONS: &str = "virtualLocations";
pub const LINKS: &str = "links";
pub const PARTICIPANTS: &str = "participants";
pub const ALERTS: &str = "alerts";

// Time
pub const START: &str = "start";
pub const DURATION: &str = "duration";
pub const DUE: &str = "due";
pub const ESTIMATED_DURATION: &str = "estimatedDuration";
pub const PERCENT_COMPLETE: &str = "percentComplete";
pub const PROGRESS: &str = "progress";

// Recurrence
pub const RECURRENCE_ID: &str = "recurrenceId";
pub const RECURRENCE_ID_TIME_ZONE: &str = "recurrenceIdTimeZone";
pub const RECURRENCE_RULES: &str = "recurrenceRules";
pub const EXCLUDED_RECURRENCE_RULES: &str = "excludedRecurrenceRules";
pub const RECURRENCE_OVERRIDES: &str = "recurrenceOverrides";
pub const EXCLUDED: &str = "excluded";

// Group
pub const ENTRIES: &str = "entries";
pub const SOURCE: &str = "source";

// Location / VirtualLocation
pub const NAME: &str = "name";
pub const LOCATION_TYPES: &str = "locationTypes";
pub const COORDINATES: &str = "coordinates";
pub const URI: &str = "uri";
pub const FEATURES: &str = "features";

// Link
pub const HREF: &str = "href";
pub const CID: &str = "cid";
pub const CONTENT_TYPE: &str = "contentType";
pub const SIZE: &str = "size";
pub const REL: &str = "rel";
pub const DISPLAY: &str = "display";

// Participant
pub const EMAIL: &str = "email";
pub const KIND: &str = "kind";
pub const ROLES: &str = "roles";
pub const LANGUAGE: &str = "language";
pub const LOCATION_ID: &str = "locationId";
pub const SEND_TO: &str = "sendTo";
pub const EXPECT_REPLY: &str = "expectReply";
pub const INVITED_BY: &str = "invitedBy";
pub const DELEGATED_TO: &str = "delegatedTo";
pub const DELEGATED_FROM: &str = "delegatedFrom";
pub const MEMBER_OF: &str = "memberOf";
pub const LINK_IDS: &str = "linkIds";
pub const PARTICIPATION_STATUS: &str = "participationStatus";
pub const PARTICIPATION_COMMENT: &str = "participationComment";
pub const SCHEDULE_AGENT: &str = "scheduleAgent";

// Relation
pub const RELATION: &str = "relation";

// Alert
pub const TRIGGER: &str = "trigger";
pub const ACTION: &str = "action";
pub const ACKNOWLEDGED: &str = "acknowledged";
pub const OFFSET: &str = "offset";
pub const RELATIVE_TO: &str = "relativeTo";
pub const WHEN: &str = "when";

// RecurrenceRule
pub const FREQUENCY: &str = "frequency";
pub const INTERVAL: &str = "interval";
pub const RSCALE: &str = "rscale";
pub const SKIP: &str = "skip";
pub const FIRST_DAY_OF_WEEK: &str = "firstDayOfWeek";
pub const BY_DAY: &str = "byDay";
pub const BY_MONTH_DAY: &str = "byMonthDay";
pub const BY_MONTH: &str = "byMonth";
pub const BY_YEAR_DAY: &str = "byYearDay";
pub const BY_WEEK_NO: &str = "byWeekNo";
pub const BY_HOUR: &str = "byHour";
pub const BY_MINUTE: &str = "byMinute";
pub const BY_SECOND: &str = "bySecond";
pub const BY_SET_POSITION: &str = "bySetPosition";
pub const COUNT: &str = "count";
pub const UNTIL: &str = "until";
pub const DAY: &str = "day";
pub const NTH_OF_PERIOD: &str = "nthOfPeriod";
