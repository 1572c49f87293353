error_chain! {
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        Json(::json::Error);
        TimeFmt(::time::ParseError);
    }
}
