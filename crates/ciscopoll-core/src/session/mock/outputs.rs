//! Captured CLI output used by scripted sessions and parser tests.

pub const IOSXR_BGP_NEIGHBORS: &str = "\
BGP neighbor is 192.0.2.1
 Remote AS 65001, local AS 65000, external link
 Description: core-router
 Remote router ID 192.0.2.1
  BGP state = Established, up for 1w2d
  NSR State: None
  Last read 00:00:14, Last read before reset 00:00:00
  Hold time is 180, keepalive interval is 60 seconds
  Configured hold time: 180, keepalive: 60, min acceptable hold time: 3
  Last write 00:00:46, attempted 19, written 19
  Received 13012 messages, 0 notifications, 0 in queue
  Sent 12994 messages, 0 notifications, 0 in queue
  Minimum time between advertisement runs is 0 secs

 For Address Family: IPv4 Unicast
  BGP neighbor version 2231
  Update group: 0.2 Filter-group: 0.1  No Refresh request being processed
  Route refresh request: received 0, sent 0
  Policy for incoming advertisements is PASS
  Policy for outgoing advertisements is PASS
  12 accepted prefixes, 10 are bestpaths
  Exact no. of prefixes denied : 0.
  Cumulative no. of prefixes denied: 0.
  Prefix advertised 7, suppressed 0, withdrawn 0
  Maximum prefixes allowed 1048576
  Threshold for warning message 75%, restart interval 0 min
  An EoR was received during read-only mode
  Last ack version 2231, Last synced ack version 0
  Outstanding version objects: current 0, max 1

 For Address Family: IPv6 Unicast
  BGP neighbor version 118
  4 accepted prefixes, 4 are bestpaths
  Prefix advertised 2, suppressed 0, withdrawn 0

  Connections established 1; dropped 0
  Local host: 192.0.2.0, Local port: 179, IF Handle: 0x00000060
  Foreign host: 192.0.2.1, Foreign port: 37829
  Last reset 00:00:00

BGP neighbor is 198.51.100.7
 Remote AS 64512.10, local AS 65000, external link
 Description: transit-b
 Remote router ID 0.0.0.0
  BGP state = Idle (No best local address found)
  NSR State: None
  Last read 00:00:00, Last read before reset 00:00:00
  Hold time is 180, keepalive interval is 60 seconds

 For Address Family: IPv4 Unicast
  BGP neighbor version 0
  0 accepted prefixes, 0 are bestpaths
  Prefix advertised 0, suppressed 0, withdrawn 0

  Connections established 0; dropped 0
  Last reset 00:00:00
";

pub const IOSXR_SHOW_VERSION: &str = "\

Cisco IOS XR Software, Version 7.3.2[Default]
Copyright (c) 2013-2021 by Cisco Systems, Inc.

Build Information:
 Built By     : ingunawa
 Built On     : Wed Oct 13 20:00:36 PDT 2021

cisco ASR9K () processor
System uptime is 12 weeks 3 days 4 hours 10 minutes
";

pub const IOSXR_PROCESS_MEMORY: &str = "\

node:      node0_RSP0_CPU0
------------------------------------------------------------------

Physical Memory: 16384M total (9536M available)
 Application Memory : 15977M (9536M available)
 Image: 4M (bootram: 0M)
 Reserved: 384M, IOMem: 0M, flashfsys: 0M
 Total shared window: 226M
";

pub const IOSXR_PROCESS_CPU: &str = "\

CPU utilization for one minute: 4%; five minutes: 3%; fifteen minutes: 2%

PID    1Min    5Min    15Min Process
1        0%      0%       0% init
1544     0%      0%       0% bash
";

pub const IOS_SHOW_VERSION: &str = "\
Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 15.0(2)SE11, RELEASE SOFTWARE (fc3)
Technical Support: http://www.cisco.com/techsupport
Copyright (c) 1986-2017 by Cisco Systems, Inc.
Compiled Sat 19-Aug-17 09:34 by prod_rel_team

ROM: Bootstrap program is C2960 boot loader
BOOTLDR: C2960 Boot Loader (C2960-HBOOT-M) Version 12.2(44)SE5, RELEASE SOFTWARE (fc1)

switch01 uptime is 2 years, 14 weeks, 1 day, 3 hours, 22 minutes
";

pub const IOS_PROCESS_MEMORY: &str = "\
Processor Pool Total: 1862154880 Used:  424017296 Free: 1438137584
      I/O Pool Total:    8388608 Used:    6283512 Free:    2105096

 PID TTY  Allocated      Freed    Holding    Getbufs    Retbufs Process
   0   0  312442736  118873184  183283344          0          0 *Init*
   0   0      12112    2695992      12112          0          0 *Sched*
";

pub const IOS_PROCESS_CPU: &str = "\
CPU utilization for five seconds: 10%/2%; one minute: 5%; five minutes: 3%
 PID Runtime(ms)     Invoked      uSecs   5Sec   1Min   5Min TTY Process
   1           0          11          0  0.00%  0.00%  0.00%   0 Chunk Manager
   2        1268      143470          8  0.00%  0.00%  0.00%   0 Load Meter
";

pub const IOSXE_SHOW_VERSION: &str = "\
Cisco IOS Software, ASR1000 Software (X86_64_LINUX_IOSD-UNIVERSALK9-M), Version 15.5(3)S5, RELEASE SOFTWARE (fc2)
Technical Support: http://www.cisco.com/techsupport
Copyright (c) 1986-2017 by Cisco Systems, Inc.

Cisco IOS XE Software, Version 16.12.04 - Extended Support Release
Cisco IOS-XE software, Copyright (c) 2005-2020 by cisco Systems, Inc.
";

pub const NXOS_SHOW_VERSION: &str = "\
Cisco Nexus Operating System (NX-OS) Software
TAC support: http://www.cisco.com/tac

Software
  BIOS: version 07.69
  NXOS: version 9.3(8)
  BIOS compile time:  04/08/2021
  NXOS image file is: bootflash:///nxos.9.3.8.bin
";
