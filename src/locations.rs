/// Storage location catalogue for the frontend dropdowns: top-level
/// temperature zones and the sub-locations inside each.
pub const STORAGE_LOCATIONS: &[(&str, &[&str])] = &[
    ("-80°C", &["Main -80°C", "-80°C Garage"]),
    ("-20°C", &["-20°C Left", "-20°C Right"]),
    (
        "4°C",
        &[
            "Glass Door 4°C",
            "Lab Mini 4°C",
            "Machine Mini 4°C",
            "Storage Room 4°C",
            "BSL2 Mini 4°C",
        ],
    ),
    (
        "Room Temperature",
        &[
            "Chemical Shelf",
            "Solvent Cabinet",
            "Acid Cabinet",
            "Base Cabinet",
            "Storage Room",
            "Wet Lab",
            "Other",
        ],
    ),
];
