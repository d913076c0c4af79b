/// Built-in schema, only the elements and attributes the services look up
pub const HTML_DATA: &str = r#"{
    "version": 1.1,
    "tags": [
        {
            "name": "html",
            "attributes": [
                { "name": "manifest" },
                { "name": "lang", "valueSet": "languages" }
            ]
        },
        {
            "name": "meta",
            "attributes": [
                { "name": "name" },
                { "name": "http-equiv", "valueSet": "httpEquiv" },
                { "name": "content" },
                { "name": "charset", "valueSet": "charsets" }
            ]
        },
        {
            "name": "link",
            "attributes": [
                { "name": "href" },
                { "name": "rel", "valueSet": "linkTypes" },
                { "name": "type" },
                { "name": "media" },
                { "name": "sizes" }
            ]
        }
    ],
    "globalAttributes": [
        { "name": "dir", "values": [{ "name": "ltr" }, { "name": "rtl" }, { "name": "auto" }] }
    ],
    "valueSets": [
        {
            "name": "charsets",
            "values": [
                { "name": "utf-8" },
                { "name": "utf-16" },
                { "name": "iso-8859-1" },
                { "name": "iso-8859-2" },
                { "name": "iso-8859-15" },
                { "name": "windows-1250" },
                { "name": "windows-1251" },
                { "name": "windows-1252" },
                { "name": "shift_jis" },
                { "name": "euc-jp" },
                { "name": "euc-kr" },
                { "name": "gb2312" },
                { "name": "big5" },
                { "name": "koi8-r" },
                { "name": "us-ascii" }
            ]
        },
        {
            "name": "languages",
            "values": [
                { "name": "ar" },
                { "name": "cs" },
                { "name": "da" },
                { "name": "de" },
                { "name": "el" },
                { "name": "en" },
                { "name": "en-GB" },
                { "name": "en-US" },
                { "name": "es" },
                { "name": "fi" },
                { "name": "fr" },
                { "name": "he" },
                { "name": "hu" },
                { "name": "it" },
                { "name": "ja" },
                { "name": "ko" },
                { "name": "nb" },
                { "name": "nl" },
                { "name": "pl" },
                { "name": "pt" },
                { "name": "pt-BR" },
                { "name": "ru" },
                { "name": "sv" },
                { "name": "tr" },
                { "name": "zh-CN" },
                { "name": "zh-TW" }
            ]
        },
        {
            "name": "httpEquiv",
            "values": [
                { "name": "X-UA-Compatible" },
                { "name": "Content-Type" },
                { "name": "refresh" },
                { "name": "Content-Language" },
                { "name": "Set-Cookie" }
            ]
        },
        {
            "name": "linkTypes",
            "values": [
                { "name": "alternate" },
                { "name": "author" },
                { "name": "help" },
                { "name": "icon" },
                { "name": "license" },
                { "name": "logo" },
                { "name": "next" },
                { "name": "prefetch" },
                { "name": "prev" },
                { "name": "search" },
                { "name": "stylesheet" }
            ]
        }
    ]
}"#;
